use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainErr};

const DEFAULT_TRAIN_SUBDIR: &str = "train";
const DEFAULT_LOCAL_DIR: &str = "/tmp/features";
const DEFAULT_ARTIFACT_NAME: &str = "iterator.model";

/// The estimator to train and its hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Multinomial logistic regression.
    Linear {
        /// Expected amount of classes; the label group decides when unset.
        #[serde(default)]
        n_classes: Option<usize>,
        /// L2 regularization strength.
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
    /// One-vs-rest gradient-boosted trees.
    Boosting {
        #[serde(default = "default_max_depth")]
        max_depth: u32,
        #[serde(default = "default_nthread")]
        nthread: usize,
        #[serde(default = "default_shrinkage")]
        shrinkage: f32,
    },
}

fn default_alpha() -> f64 {
    1.0
}

fn default_max_depth() -> u32 {
    6
}

fn default_nthread() -> usize {
    4
}

fn default_shrinkage() -> f32 {
    0.3
}

impl ModelConfig {
    /// The linear classifier as the iris script configures it: three classes.
    pub fn linear() -> Self {
        Self::Linear {
            n_classes: Some(3),
            alpha: default_alpha(),
        }
    }

    /// The boosting classifier with depth 6 trees on 4 threads.
    pub fn boosting() -> Self {
        Self::Boosting {
            max_depth: default_max_depth(),
            nthread: default_nthread(),
            shrinkage: default_shrinkage(),
        }
    }

    /// The directory, under the training set, the artifact is published to.
    pub fn artifact_subdir(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Boosting { .. } => "xgboost",
        }
    }

    /// The amount of steps/rounds used when none is configured.
    pub fn default_rounds(&self) -> usize {
        match self {
            Self::Linear { .. } => 100,
            Self::Boosting { .. } => 50,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Linear { n_classes, alpha } => {
                if n_classes == Some(0) {
                    return Err(TrainErr::InvalidConfig(
                        "n_classes must be greater than 0".into(),
                    ));
                }
                if !alpha.is_finite() || alpha < 0.0 {
                    return Err(TrainErr::InvalidConfig(format!(
                        "alpha must be a non-negative number, got {alpha}"
                    )));
                }
            }
            Self::Boosting {
                max_depth,
                nthread,
                shrinkage,
            } => {
                if max_depth == 0 {
                    return Err(TrainErr::InvalidConfig(
                        "max_depth must be greater than 0".into(),
                    ));
                }
                if nthread == 0 {
                    return Err(TrainErr::InvalidConfig(
                        "nthread must be greater than 0".into(),
                    ));
                }
                if !(shrinkage > 0.0 && shrinkage <= 1.0) {
                    return Err(TrainErr::InvalidConfig(format!(
                        "shrinkage must be in (0, 1], got {shrinkage}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Everything a training run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Base path of the training set.
    pub training_set: PathBuf,
    #[serde(default = "default_train_subdir")]
    pub train_subdir: String,
    #[serde(default)]
    pub eval_subdir: Option<String>,
    /// Training steps (linear) or boosting rounds; the model's default when unset.
    #[serde(default)]
    pub rounds: Option<NonZeroUsize>,
    /// Where the artifact is written before being copied to the training set.
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,
    pub model: ModelConfig,
}

fn default_train_subdir() -> String {
    DEFAULT_TRAIN_SUBDIR.to_string()
}

fn default_local_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL_DIR)
}

fn default_artifact_name() -> String {
    DEFAULT_ARTIFACT_NAME.to_string()
}

impl TrainingConfig {
    /// Creates a configuration with every optional field at its default.
    pub fn new(training_set: impl Into<PathBuf>, model: ModelConfig) -> Self {
        Self {
            training_set: training_set.into(),
            train_subdir: default_train_subdir(),
            eval_subdir: None,
            rounds: None,
            local_dir: default_local_dir(),
            artifact_name: default_artifact_name(),
            model,
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| TrainErr::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| {
            TrainErr::InvalidConfig(format!("cannot parse '{}': {e}", path.display()))
        })
    }

    pub fn rounds(&self) -> usize {
        self.rounds
            .map_or_else(|| self.model.default_rounds(), NonZeroUsize::get)
    }

    pub fn train_dir(&self) -> PathBuf {
        self.training_set.join(&self.train_subdir)
    }

    pub fn eval_dir(&self) -> Option<PathBuf> {
        self.eval_subdir
            .as_ref()
            .map(|subdir| self.training_set.join(subdir))
    }

    /// Where the artifact is saved first.
    pub fn local_artifact(&self) -> PathBuf {
        self.local_dir.join(&self.artifact_name)
    }

    /// Where the artifact ends up.
    pub fn output_artifact(&self) -> PathBuf {
        self.training_set
            .join(self.model.artifact_subdir())
            .join(&self.artifact_name)
    }

    /// Checks the configuration before any data is touched.
    ///
    /// # Errors
    /// Returns `InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.training_set.as_os_str().is_empty() {
            return Err(TrainErr::InvalidConfig("training_set must be set".into()));
        }

        if self.train_subdir.is_empty() {
            return Err(TrainErr::InvalidConfig(
                "train_subdir must not be empty".into(),
            ));
        }

        if self.eval_subdir.as_deref() == Some("") {
            return Err(TrainErr::InvalidConfig(
                "eval_subdir must not be empty".into(),
            ));
        }

        let plain_name = Path::new(&self.artifact_name)
            .file_name()
            .is_some_and(|name| name == self.artifact_name.as_str());
        if !plain_name {
            return Err(TrainErr::InvalidConfig(format!(
                "artifact_name must be a plain file name, got '{}'",
                self.artifact_name
            )));
        }

        if self.local_artifact() == self.output_artifact() {
            return Err(TrainErr::InvalidConfig(format!(
                "local_dir must not be the output directory '{}'",
                self.local_dir.display()
            )));
        }

        self.model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_are_filled_in() {
        let config: TrainingConfig = serde_json::from_str(
            r#"{"training_set": "/data/iris", "model": {"kind": "boosting"}}"#,
        )
        .unwrap();

        assert_eq!(config, TrainingConfig::new("/data/iris", ModelConfig::boosting()));
        assert_eq!(config.rounds(), 50);
        assert_eq!(config.train_dir(), Path::new("/data/iris/train"));
        assert_eq!(config.eval_dir(), None);
        assert_eq!(config.local_artifact(), Path::new("/tmp/features/iterator.model"));
        assert_eq!(
            config.output_artifact(),
            Path::new("/data/iris/xgboost/iterator.model")
        );
    }

    #[test]
    fn explicit_values_win() {
        let config: TrainingConfig = serde_json::from_str(
            r#"{
                "training_set": "/data/iris",
                "train_subdir": "tr",
                "eval_subdir": "ev",
                "rounds": 7,
                "model": {"kind": "linear", "n_classes": 3, "alpha": 0.5}
            }"#,
        )
        .unwrap();

        assert_eq!(config.rounds(), 7);
        assert_eq!(config.eval_dir(), Some(PathBuf::from("/data/iris/ev")));
        assert_eq!(
            config.model,
            ModelConfig::Linear {
                n_classes: Some(3),
                alpha: 0.5
            }
        );
        assert_eq!(
            config.output_artifact(),
            Path::new("/data/iris/linear/iterator.model")
        );
    }

    #[test]
    fn zero_rounds_do_not_parse() {
        let res: std::result::Result<TrainingConfig, _> = serde_json::from_str(
            r#"{"training_set": "/d", "rounds": 0, "model": {"kind": "linear"}}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = TrainingConfig::new("/d", ModelConfig::boosting());
        assert!(config.validate().is_ok());

        config.artifact_name = "../escape.model".into();
        assert!(matches!(config.validate(), Err(TrainErr::InvalidConfig(_))));

        config.artifact_name = "iterator.model".into();
        config.model = ModelConfig::Boosting {
            max_depth: 6,
            nthread: 0,
            shrinkage: 0.3,
        };
        assert!(matches!(config.validate(), Err(TrainErr::InvalidConfig(_))));

        config.model = ModelConfig::Boosting {
            max_depth: 6,
            nthread: 4,
            shrinkage: 1.5,
        };
        assert!(matches!(config.validate(), Err(TrainErr::InvalidConfig(_))));

        config.model = ModelConfig::Linear {
            n_classes: Some(0),
            alpha: 1.0,
        };
        assert!(matches!(config.validate(), Err(TrainErr::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_staging_into_the_output() {
        let mut config = TrainingConfig::new("/data/iris", ModelConfig::linear());
        config.local_dir = "/data/iris/linear".into();
        assert!(matches!(config.validate(), Err(TrainErr::InvalidConfig(_))));

        config.local_dir = "/data/iris/xgboost".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_json_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = TrainingConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, TrainErr::InvalidConfig(_)));
    }
}
