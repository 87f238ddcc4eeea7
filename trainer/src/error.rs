use std::{fmt, io, path::PathBuf};

use dataset::DatasetErr;

/// The trainer module's result type.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// All errors that can occur while training a model.
#[derive(Debug)]
pub enum TrainErr {
    /// Invalid configuration, caught before reading any data.
    InvalidConfig(String),
    /// The dataset could not be read or reshaped.
    Dataset(DatasetErr),
    /// The dataset has no rows to train or evaluate on.
    EmptyDataset { path: PathBuf },
    /// A split does not have the feature layout the model was fit on.
    FeatureMismatch {
        path: PathBuf,
        expected: Vec<String>,
        got: Vec<String>,
    },
    /// The underlying estimator failed.
    Backend { estimator: &'static str, msg: String },
    /// Failed to write or copy the model artifact.
    Io { path: PathBuf, source: io::Error },
    /// Failed to serialize the model artifact.
    Serialize(serde_json::Error),
}

impl fmt::Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Dataset(e) => write!(f, "dataset error: {e}"),
            Self::EmptyDataset { path } => write!(f, "dataset '{}' has no rows", path.display()),
            Self::FeatureMismatch {
                path,
                expected,
                got,
            } => write!(
                f,
                "dataset '{}' has features {got:?}, expected {expected:?}",
                path.display()
            ),
            Self::Backend { estimator, msg } => write!(f, "{estimator} estimator failed: {msg}"),
            Self::Io { path, source } => write!(f, "io error on '{}': {source}", path.display()),
            Self::Serialize(e) => write!(f, "failed to serialize model: {e}"),
        }
    }
}

impl std::error::Error for TrainErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dataset(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DatasetErr> for TrainErr {
    fn from(e: DatasetErr) -> Self {
        Self::Dataset(e)
    }
}

impl From<serde_json::Error> for TrainErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
