use std::{mem, num::NonZeroUsize, path::PathBuf};

use clap::{Args, Parser};
use trainer::{ModelConfig, Result, TrainErr, TrainingConfig};

/// Flags shared by every training entry point.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// JSON configuration file; the flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base path of the training set.
    #[arg(long)]
    pub training_set: Option<PathBuf>,

    /// Training data subdirectory [default: train]
    #[arg(long)]
    pub train_subdir: Option<String>,

    /// Evaluation data subdirectory.
    #[arg(long)]
    pub eval_subdir: Option<String>,

    /// Number of training steps or boosting rounds.
    #[arg(long)]
    pub rounds: Option<NonZeroUsize>,

    /// Local staging directory [default: /tmp/features]
    #[arg(long)]
    pub local_dir: Option<PathBuf>,
}

impl CommonArgs {
    /// Builds the training configuration for a `model` of the given kind.
    ///
    /// # Errors
    /// Fails if the configuration file cannot be read, has a different model kind, or no
    /// training set is given at all.
    pub fn resolve(&self, model: ModelConfig) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::from_json_file(path)?,
            None => {
                let training_set = self.training_set.clone().ok_or_else(|| {
                    TrainErr::InvalidConfig("--training-set is required without --config".into())
                })?;
                TrainingConfig::new(training_set, model.clone())
            }
        };

        if mem::discriminant(&config.model) != mem::discriminant(&model) {
            return Err(TrainErr::InvalidConfig(format!(
                "expected a {} model, the configuration holds a {} one",
                model.artifact_subdir(),
                config.model.artifact_subdir()
            )));
        }

        if let Some(training_set) = &self.training_set {
            config.training_set = training_set.clone();
        }
        if let Some(train_subdir) = &self.train_subdir {
            config.train_subdir = train_subdir.clone();
        }
        if let Some(eval_subdir) = &self.eval_subdir {
            config.eval_subdir = Some(eval_subdir.clone());
        }
        if let Some(rounds) = self.rounds {
            config.rounds = Some(rounds);
        }
        if let Some(local_dir) = &self.local_dir {
            config.local_dir = local_dir.clone();
        }

        Ok(config)
    }
}

/// Trains a linear classifier on the iris feature set.
#[derive(Debug, Parser)]
#[command(name = "iris-linear", version)]
pub struct LinearCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of classes the label group must have.
    #[arg(long)]
    pub n_classes: Option<usize>,

    /// L2 regularization strength.
    #[arg(long)]
    pub alpha: Option<f64>,
}

impl LinearCli {
    pub fn into_config(self) -> Result<TrainingConfig> {
        let mut config = self.common.resolve(ModelConfig::linear())?;

        if let ModelConfig::Linear { n_classes, alpha } = &mut config.model {
            if self.n_classes.is_some() {
                *n_classes = self.n_classes;
            }
            if let Some(a) = self.alpha {
                *alpha = a;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Trains gradient-boosted trees on the iris feature set.
#[derive(Debug, Parser)]
#[command(name = "iris-xgboost", version)]
pub struct XgboostCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Maximum tree depth.
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Threads used for fitting.
    #[arg(long)]
    pub nthread: Option<usize>,

    /// Learning rate of every tree.
    #[arg(long)]
    pub shrinkage: Option<f32>,
}

impl XgboostCli {
    pub fn into_config(self) -> Result<TrainingConfig> {
        let mut config = self.common.resolve(ModelConfig::boosting())?;

        if let ModelConfig::Boosting {
            max_depth,
            nthread,
            shrinkage,
        } = &mut config.model
        {
            if let Some(d) = self.max_depth {
                *max_depth = d;
            }
            if let Some(n) = self.nthread {
                *nthread = n;
            }
            if let Some(s) = self.shrinkage {
                *shrinkage = s;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;

    #[test]
    fn linear_flags_build_config() {
        let cli = LinearCli::try_parse_from([
            "iris-linear",
            "--training-set",
            "/data/iris",
            "--rounds",
            "10",
            "--alpha",
            "0.1",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.training_set, Path::new("/data/iris"));
        assert_eq!(config.rounds(), 10);
        assert_eq!(
            config.model,
            ModelConfig::Linear {
                n_classes: Some(3),
                alpha: 0.1
            }
        );
    }

    #[test]
    fn xgboost_defaults_match_the_iris_script() {
        let cli = XgboostCli::try_parse_from(["iris-xgboost", "--training-set", "/d"]).unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.rounds(), 50);
        assert_eq!(config.local_dir, Path::new("/tmp/features"));
        assert_eq!(config.model, ModelConfig::boosting());
    }

    #[test]
    fn training_set_is_required_without_config() {
        let cli = XgboostCli::try_parse_from(["iris-xgboost"]).unwrap();
        assert!(matches!(cli.into_config(), Err(TrainErr::InvalidConfig(_))));
    }

    #[test]
    fn zero_rounds_are_rejected_by_the_parser() {
        let res = XgboostCli::try_parse_from(["iris-xgboost", "--training-set", "/d", "--rounds", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"training_set": "/from/file", "eval_subdir": "eval", "rounds": 5,
                "model": {"kind": "boosting", "max_depth": 4}}"#,
        )
        .unwrap();

        let cli = XgboostCli::try_parse_from([
            "iris-xgboost",
            "--config",
            path.to_str().unwrap(),
            "--rounds",
            "8",
            "--nthread",
            "2",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.training_set, Path::new("/from/file"));
        assert_eq!(config.eval_subdir.as_deref(), Some("eval"));
        assert_eq!(config.rounds(), 8);
        assert_eq!(
            config.model,
            ModelConfig::Boosting {
                max_depth: 4,
                nthread: 2,
                shrinkage: 0.3
            }
        );
    }

    #[test]
    fn shipped_configs_are_valid() {
        let configs = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs");

        for (name, subdir) in [("iris-linear.json", "linear"), ("iris-xgboost.json", "xgboost")] {
            let config = TrainingConfig::from_json_file(&configs.join(name)).unwrap();
            config.validate().unwrap();
            assert_eq!(config.model.artifact_subdir(), subdir);
        }
    }

    #[test]
    fn config_of_the_other_kind_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"training_set": "/d", "model": {"kind": "linear"}}"#).unwrap();

        let cli =
            XgboostCli::try_parse_from(["iris-xgboost", "--config", path.to_str().unwrap()])
                .unwrap();
        assert!(matches!(cli.into_config(), Err(TrainErr::InvalidConfig(_))));
    }
}
