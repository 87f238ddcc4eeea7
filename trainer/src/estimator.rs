use dataset::Examples;
use ndarray::{Array1, ArrayView2};

use crate::{
    boosting::BoostedTrees,
    config::{ModelConfig, TrainingConfig},
    error::{Result, TrainErr},
    linear::LinearClassifier,
};

/// Something that can be fit on training examples.
pub trait Estimator {
    /// A short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fits a model on `train`.
    fn fit(&self, train: &Examples) -> Result<Box<dyn TrainedModel>>;
}

/// A fitted model.
pub trait TrainedModel {
    /// Predicts the class index of every row of `features`.
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>>;

    /// Serializes the model into its artifact bytes.
    fn to_json(&self) -> Result<Vec<u8>>;
}

/// Builds `Estimator`s given a configuration.
#[derive(Default)]
pub struct EstimatorBuilder;

impl EstimatorBuilder {
    /// Creates a new `EstimatorBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Estimator` following a configuration.
    ///
    /// # Arguments
    /// * `config` - The training configuration.
    /// * `num_classes` - The amount of classes found in the dataset's label group.
    ///
    /// # Errors
    /// `InvalidConfig` if the configured class count disagrees with the dataset.
    pub fn build(&self, config: &TrainingConfig, num_classes: usize) -> Result<Box<dyn Estimator>> {
        let rounds = config.rounds();

        let estimator: Box<dyn Estimator> = match config.model {
            ModelConfig::Linear { n_classes, alpha } => {
                if let Some(n) = n_classes.filter(|&n| n != num_classes) {
                    return Err(TrainErr::InvalidConfig(format!(
                        "configured {n} classes but the dataset has {num_classes} label columns"
                    )));
                }
                Box::new(LinearClassifier::new(rounds, alpha))
            }
            ModelConfig::Boosting {
                max_depth,
                nthread,
                shrinkage,
            } => Box::new(BoostedTrees::new(rounds, max_depth, shrinkage, nthread)),
        };

        Ok(estimator)
    }
}
