use std::{collections::BTreeMap, slice};

use serde::{Deserialize, Serialize};

/// A single row of the dataset, keyed by column name.
pub type Record = BTreeMap<String, Value>;

/// A column value: either a scalar or a small fixed-length vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    /// The amount of numbers this value holds.
    #[inline]
    pub fn width(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns the scalar, or `None` if this is a vector value.
    #[inline]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Vector(_) => None,
        }
    }

    /// Views the value as a flat slice; a scalar is a slice of length one.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Value::Scalar(x) => slice::from_ref(x),
            Value::Vector(xs) => xs,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::Vector(value)
    }
}

/// Builds a `Record` out of `(column, value)` pairs.
pub fn record<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
