use crate::{
    context::{FeatureGroups, Group},
    error::{DatasetErr, Result},
    record::{Record, Value},
};

/// The values of a single named column, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A column-major batch: one value sequence per column, all of them row-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnBatch {
    columns: Vec<Column>,
}

impl ColumnBatch {
    fn with_columns(names: &[String], rows: usize) -> Self {
        let columns = names
            .iter()
            .map(|name| Column {
                name: name.clone(),
                values: Vec::with_capacity(rows),
            })
            .collect();

        Self { columns }
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the values of the column named `name`.
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The amount of rows, zero if the batch has no columns.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Iterates over the values of row `row`, in column order.
    ///
    /// # Panics
    /// If `row` is out of bounds.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(move |c| &c.values[row])
    }
}

/// The output of `partition`.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitioned {
    pub features: ColumnBatch,
    pub labels: ColumnBatch,
}

/// Splits every record into its feature and label values, transposing them into column-major
/// batches that keep the source row order.
///
/// # Arguments
/// * `records` - The dataset rows.
/// * `groups` - The feature/label split of the columns.
///
/// # Errors
/// * `UnknownColumn` if a record holds a column that is in neither group.
/// * `MissingColumn` if a record lacks one of the grouped columns.
pub fn partition(records: &[Record], groups: &FeatureGroups) -> Result<Partitioned> {
    let mut features = ColumnBatch::with_columns(groups.features(), records.len());
    let mut labels = ColumnBatch::with_columns(groups.labels(), records.len());

    for (row, record) in records.iter().enumerate() {
        for (column, value) in record {
            let Some((group, idx)) = groups.resolve(column) else {
                return Err(DatasetErr::UnknownColumn {
                    row,
                    column: column.clone(),
                });
            };

            let batch = match group {
                Group::Feature => &mut features,
                Group::Label => &mut labels,
            };
            batch.columns[idx].values.push(value.clone());
        }

        // every record must fill every column exactly once
        let missing = features
            .columns
            .iter()
            .chain(&labels.columns)
            .find(|c| c.values.len() != row + 1);

        if let Some(column) = missing {
            return Err(DatasetErr::MissingColumn {
                row,
                column: column.name.clone(),
            });
        }
    }

    Ok(Partitioned { features, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;

    fn groups() -> FeatureGroups {
        FeatureGroups::new(["f1", "f2"], ["c0", "c1", "c2"]).unwrap()
    }

    fn rows() -> Vec<Record> {
        vec![
            record([("f1", 1.0), ("f2", 2.0), ("c0", 0.0), ("c1", 1.0), ("c2", 0.0)]),
            record([("f1", 3.0), ("f2", 4.0), ("c0", 1.0), ("c1", 0.0), ("c2", 0.0)]),
        ]
    }

    fn scalars(values: &[Value]) -> Vec<f64> {
        values.iter().map(|v| v.as_scalar().unwrap()).collect()
    }

    #[test]
    fn splits_and_transposes_rows() {
        let Partitioned { features, labels } = partition(&rows(), &groups()).unwrap();

        assert_eq!(features.num_columns(), 2);
        assert_eq!(features.num_rows(), 2);
        assert_eq!(scalars(features.get("f1").unwrap()), [1.0, 3.0]);
        assert_eq!(scalars(features.get("f2").unwrap()), [2.0, 4.0]);

        assert_eq!(labels.num_columns(), 3);
        assert_eq!(scalars(labels.get("c0").unwrap()), [0.0, 1.0]);
        assert_eq!(scalars(labels.get("c1").unwrap()), [1.0, 0.0]);
        assert_eq!(scalars(labels.get("c2").unwrap()), [0.0, 0.0]);
    }

    #[test]
    fn columns_follow_group_order() {
        let groups = FeatureGroups::new(["f2", "f1"], ["c2", "c1", "c0"]).unwrap();
        let p = partition(&rows(), &groups).unwrap();

        let names: Vec<_> = p.features.columns().iter().map(Column::name).collect();
        assert_eq!(names, ["f2", "f1"]);

        let row: Vec<_> = p.labels.row(0).map(|v| v.as_scalar().unwrap()).collect();
        assert_eq!(row, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn partition_is_deterministic() {
        let a = partition(&rows(), &groups()).unwrap();
        let b = partition(&rows(), &groups()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_column_is_not_routed_to_labels() {
        let mut rows = rows();
        rows[1].insert("typo".into(), Value::Scalar(9.0));

        let err = partition(&rows, &groups()).unwrap_err();
        assert!(matches!(err, DatasetErr::UnknownColumn { row: 1, column } if column == "typo"));
    }

    #[test]
    fn missing_column_is_rejected() {
        let mut rows = rows();
        rows[0].remove("c2");

        let err = partition(&rows, &groups()).unwrap_err();
        assert!(matches!(err, DatasetErr::MissingColumn { row: 0, column } if column == "c2"));
    }

    #[test]
    fn empty_dataset_gives_empty_columns() {
        let p = partition(&[], &groups()).unwrap();
        assert_eq!(p.features.num_columns(), 2);
        assert_eq!(p.features.num_rows(), 0);
        assert_eq!(p.labels.num_rows(), 0);
    }
}
