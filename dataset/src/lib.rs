pub mod context;
pub mod encode;
pub mod error;
pub mod examples;
pub mod partition;
pub mod reader;
pub mod record;

pub use context::{FeatureGroups, Group, get_context};
pub use encode::{encode, encode_labels};
pub use error::{DatasetErr, Result};
pub use examples::Examples;
pub use partition::{ColumnBatch, Partitioned, partition};
pub use reader::read_dataset;
pub use record::{Record, Value};
