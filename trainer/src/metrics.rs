use dataset::{DatasetErr, Examples};
use log::info;
use serde::Serialize;

use crate::{
    error::{Result, TrainErr},
    estimator::TrainedModel,
};

/// The quality of a model on one split of the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub name: String,
    pub rows: usize,
    pub accuracy: f64,
}

/// The fraction of `predicted` that equals `actual`, zero for empty inputs.
///
/// # Errors
/// `ShapeMismatch` if the two slices have different lengths.
pub fn accuracy(predicted: &[usize], actual: &[usize]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(TrainErr::Dataset(DatasetErr::ShapeMismatch {
            what: "predictions".into(),
            got: predicted.len(),
            expected: actual.len(),
        }));
    }

    if actual.is_empty() {
        return Ok(0.0);
    }

    let hits = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    Ok(hits as f64 / actual.len() as f64)
}

/// Evaluates `model` on `examples` and logs the result under `name`.
pub fn evaluate(model: &dyn TrainedModel, name: &str, examples: &Examples) -> Result<Evaluation> {
    let predicted = model.predict(examples.features())?;
    let actual = examples.labels();

    let accuracy = accuracy(&predicted.to_vec(), &actual.to_vec())?;
    info!(
        "[{name}] rows={} accuracy={accuracy:.4}",
        examples.num_rows()
    );

    Ok(Evaluation {
        name: name.to_string(),
        rows: examples.num_rows(),
        accuracy,
    })
}
