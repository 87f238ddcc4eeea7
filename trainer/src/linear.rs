use dataset::Examples;
use linfa::prelude::*;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use log::info;
use ndarray::{Array1, ArrayView2};
use serde::Serialize;

use crate::{
    error::{Result, TrainErr},
    estimator::{Estimator, TrainedModel},
};

const NAME: &str = "linear";

/// A linear classifier: multinomial logistic regression.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    max_iterations: usize,
    alpha: f64,
}

impl LinearClassifier {
    /// Returns a new `LinearClassifier`.
    ///
    /// # Arguments
    /// * `max_iterations` - The maximum amount of optimizer steps.
    /// * `alpha` - The L2 regularization strength.
    pub fn new(max_iterations: usize, alpha: f64) -> Self {
        Self {
            max_iterations,
            alpha,
        }
    }
}

impl Estimator for LinearClassifier {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(&self, train: &Examples) -> Result<Box<dyn TrainedModel>> {
        info!(
            "fitting linear classifier on {} rows, {} features, at most {} steps",
            train.num_rows(),
            train.num_features(),
            self.max_iterations
        );

        let dataset = Dataset::new(train.features().to_owned(), train.labels().to_owned());
        let model = MultiLogisticRegression::new()
            .max_iterations(self.max_iterations as u64)
            .alpha(self.alpha)
            .fit(&dataset)
            .map_err(|e| TrainErr::Backend {
                estimator: NAME,
                msg: e.to_string(),
            })?;

        Ok(Box::new(FittedLinear {
            model,
            feature_names: train.feature_names().to_vec(),
        }))
    }
}

struct FittedLinear {
    model: MultiFittedLogisticRegression<f64, usize>,
    feature_names: Vec<String>,
}

/// The on-disk form of a fitted linear classifier.
#[derive(Serialize)]
struct LinearArtifact<'a> {
    kind: &'static str,
    feature_names: &'a [String],
    classes: &'a [usize],
    intercept: Vec<f64>,
    /// One row per feature, one column per class.
    weights: Vec<Vec<f64>>,
}

impl TrainedModel for FittedLinear {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        if features.ncols() != self.feature_names.len() {
            return Err(TrainErr::Backend {
                estimator: NAME,
                msg: format!(
                    "expected {} features, got {}",
                    self.feature_names.len(),
                    features.ncols()
                ),
            });
        }

        Ok(self.model.predict(&features))
    }

    fn to_json(&self) -> Result<Vec<u8>> {
        let artifact = LinearArtifact {
            kind: "multinomial_logistic_regression",
            feature_names: &self.feature_names,
            classes: self.model.classes(),
            intercept: self.model.intercept().to_vec(),
            weights: self
                .model
                .params()
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
        };

        Ok(serde_json::to_vec(&artifact)?)
    }
}
