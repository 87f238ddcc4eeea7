use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used in the entire dataset module.
pub type Result<T> = std::result::Result<T, DatasetErr>;

/// The dataset module's error type.
#[derive(Debug)]
pub enum DatasetErr {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    NoDataFiles {
        path: PathBuf,
    },
    InvalidFeatureGroups {
        got: usize,
    },
    DuplicateColumn {
        column: String,
    },
    OverlappingColumn {
        column: String,
    },
    UnknownColumn {
        row: usize,
        column: String,
    },
    MissingColumn {
        row: usize,
        column: String,
    },
    ShapeMismatch {
        what: String,
        got: usize,
        expected: usize,
    },
    /// An empty one-hot label; `row` is known only when encoding a whole batch.
    EmptyLabel {
        row: Option<usize>,
    },
}

impl Display for DatasetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetErr::Io { path, source } => {
                write!(f, "io error on '{}': {source}", path.display())
            }
            DatasetErr::Json { path, line, source } => {
                write!(f, "invalid JSON in '{}' at line {line}: {source}", path.display())
            }
            DatasetErr::NoDataFiles { path } => {
                write!(f, "no data files found in '{}'", path.display())
            }
            DatasetErr::InvalidFeatureGroups { got } => write!(
                f,
                "expected exactly 2 feature groups (features, labels), got {got}"
            ),
            DatasetErr::DuplicateColumn { column } => {
                write!(f, "column '{column}' is listed more than once")
            }
            DatasetErr::OverlappingColumn { column } => {
                write!(f, "column '{column}' belongs to both the feature and the label group")
            }
            DatasetErr::UnknownColumn { row, column } => write!(
                f,
                "row {row} has column '{column}' which is neither a feature nor a label"
            ),
            DatasetErr::MissingColumn { row, column } => {
                write!(f, "row {row} is missing column '{column}'")
            }
            DatasetErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a shape mismatch in {what}, got {got} and expected {expected}"
            ),
            DatasetErr::EmptyLabel { row: Some(row) } => {
                write!(f, "row {row} has an empty label vector")
            }
            DatasetErr::EmptyLabel { row: None } => write!(f, "empty label vector"),
        }
    }
}

impl Error for DatasetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatasetErr::Io { source, .. } => Some(source),
            DatasetErr::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
