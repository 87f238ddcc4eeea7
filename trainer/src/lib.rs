pub mod artifact;
pub mod boosting;
pub mod config;
pub mod error;
pub mod estimator;
pub mod linear;
pub mod metrics;

use std::path::{Path, PathBuf};

use dataset::{Examples, FeatureGroups, get_context, read_dataset};
use log::info;

pub use config::{ModelConfig, TrainingConfig};
pub use error::{Result, TrainErr};
pub use estimator::{Estimator, EstimatorBuilder, TrainedModel};
pub use metrics::Evaluation;

/// The outcome of a successful training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Where the artifact was published.
    pub artifact: PathBuf,
    pub train: Evaluation,
    pub eval: Option<Evaluation>,
}

/// Runs a whole training: reads the dataset, fits the configured estimator and publishes its
/// artifact.
///
/// # Errors
/// Returns the first error found; nothing is published unless fitting and saving succeed.
pub fn train(config: &TrainingConfig) -> Result<TrainReport> {
    config.validate()?;

    let train_dir = config.train_dir();
    let groups = get_context(&train_dir)?;
    info!(
        "training on {} with {} features and {} classes",
        train_dir.display(),
        groups.features().len(),
        groups.num_classes()
    );

    let train_set = load_examples(&train_dir, &groups)?;
    let eval_set = config
        .eval_dir()
        .map(|dir| {
            let eval_set = load_examples(&dir, &groups)?;
            check_layout(&dir, &train_set, &eval_set)?;
            Ok::<_, TrainErr>(eval_set)
        })
        .transpose()?;

    let estimator = EstimatorBuilder::new().build(config, groups.num_classes())?;
    let model = estimator.fit(&train_set)?;
    info!("{} estimator fitted", estimator.name());

    let train = metrics::evaluate(model.as_ref(), "train", &train_set)?;
    let eval = eval_set
        .as_ref()
        .map(|set| metrics::evaluate(model.as_ref(), "eval", set))
        .transpose()?;

    let local = config.local_artifact();
    let output = config.output_artifact();
    artifact::save(model.as_ref(), &local)?;
    artifact::publish(&local, &output)?;

    Ok(TrainReport {
        artifact: output,
        train,
        eval,
    })
}

fn load_examples(dir: &Path, groups: &FeatureGroups) -> Result<Examples> {
    let records = read_dataset(dir)?;
    let examples = Examples::from_records(&records, groups)?;

    if examples.is_empty() {
        return Err(TrainErr::EmptyDataset {
            path: dir.to_path_buf(),
        });
    }

    info!(
        "loaded {} examples from {}, class counts {:?}",
        examples.num_rows(),
        dir.display(),
        examples.class_counts()
    );
    Ok(examples)
}

/// Vector columns may change width between splits, so equal groups do not imply equal layouts.
fn check_layout(dir: &Path, train_set: &Examples, eval_set: &Examples) -> Result<()> {
    if eval_set.feature_names() == train_set.feature_names() {
        return Ok(());
    }

    Err(TrainErr::FeatureMismatch {
        path: dir.to_path_buf(),
        expected: train_set.feature_names().to_vec(),
        got: eval_set.feature_names().to_vec(),
    })
}
