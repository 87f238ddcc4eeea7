use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{
    context::FeatureGroups,
    encode::encode_labels,
    error::{DatasetErr, Result},
    partition::{ColumnBatch, Partitioned, partition},
    record::{Record, Value},
};

/// Dense training examples: a row-major feature matrix and its class indices.
///
/// Vector-valued feature columns are expanded into one matrix column per element, named
/// `column[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Examples {
    features: Array2<f64>,
    labels: Array1<usize>,
    feature_names: Vec<String>,
    num_classes: usize,
}

impl Examples {
    /// Partitions and encodes `records` into dense examples.
    pub fn from_records(records: &[Record], groups: &FeatureGroups) -> Result<Self> {
        let partitioned = partition(records, groups)?;
        Self::from_partitioned(&partitioned, groups.num_classes())
    }

    /// Encodes the labels of an already partitioned batch and densifies its features.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the label shape is wrong, a feature column changes width between rows
    ///   or features and labels have a different amount of rows.
    pub fn from_partitioned(partitioned: &Partitioned, num_classes: usize) -> Result<Self> {
        let Partitioned { features, labels } = partitioned;

        let encoded = encode_labels(labels, num_classes)?;
        let rows = features.num_rows();

        if features.num_columns() > 0 && encoded.len() != rows {
            return Err(DatasetErr::ShapeMismatch {
                what: "feature and label rows".into(),
                got: encoded.len(),
                expected: rows,
            });
        }

        let rows = encoded.len();
        let widths = column_widths(features)?;
        let feature_names = expand_names(features, &widths);

        let mut data = Vec::with_capacity(rows * feature_names.len());
        for row in 0..rows {
            for value in features.row(row) {
                data.extend_from_slice(value.as_slice());
            }
        }

        let features = Array2::from_shape_vec((rows, feature_names.len()), data).map_err(|_| {
            DatasetErr::ShapeMismatch {
                what: "feature matrix".into(),
                got: rows,
                expected: feature_names.len(),
            }
        })?;

        Ok(Self {
            features,
            labels: Array1::from_vec(encoded),
            feature_names,
            num_classes,
        })
    }

    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    #[inline]
    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.labels.view()
    }

    #[inline]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Counts how many examples belong to each class.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_classes];
        for &label in &self.labels {
            if let Some(count) = counts.get_mut(label) {
                *count += 1;
            }
        }
        counts
    }
}

/// The width of every feature column, taken from its first row and checked on the rest.
fn column_widths(features: &ColumnBatch) -> Result<Vec<Option<usize>>> {
    features
        .columns()
        .iter()
        .map(|column| {
            let mut values = column.values().iter();
            let Some(first) = values.next() else {
                return Ok(None);
            };

            let width = first.width();
            for (row, value) in values.enumerate() {
                if value.width() != width {
                    return Err(DatasetErr::ShapeMismatch {
                        what: format!("feature '{}' at row {}", column.name(), row + 1),
                        got: value.width(),
                        expected: width,
                    });
                }
            }

            Ok(matches!(first, Value::Vector(_)).then_some(width))
        })
        .collect()
}

fn expand_names(features: &ColumnBatch, widths: &[Option<usize>]) -> Vec<String> {
    features
        .columns()
        .iter()
        .zip(widths)
        .flat_map(|(column, width)| match width {
            None => vec![column.name().to_string()],
            Some(n) => (0..*n).map(|i| format!("{}[{i}]", column.name())).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::record::record;

    fn groups() -> FeatureGroups {
        FeatureGroups::new(["f1", "f2"], ["c0", "c1", "c2"]).unwrap()
    }

    #[test]
    fn builds_matrix_and_encoded_labels() {
        let rows = vec![
            record([("f1", 1.0), ("f2", 2.0), ("c0", 0.0), ("c1", 1.0), ("c2", 0.0)]),
            record([("f1", 3.0), ("f2", 4.0), ("c0", 1.0), ("c1", 0.0), ("c2", 0.0)]),
        ];

        let ex = Examples::from_records(&rows, &groups()).unwrap();

        assert_eq!(ex.features(), array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(ex.labels(), array![1usize, 0]);
        assert_eq!(ex.feature_names(), ["f1", "f2"]);
        assert_eq!(ex.class_counts(), [1, 1, 0]);
    }

    #[test]
    fn vector_features_are_expanded() {
        let groups = FeatureGroups::new(["v", "s"], ["a", "b"]).unwrap();
        let mut rows = vec![record([("s", 1.0), ("a", 1.0), ("b", 0.0)]); 2];
        rows[0].insert("v".into(), Value::Vector(vec![0.1, 0.2]));
        rows[1].insert("v".into(), Value::Vector(vec![0.3, 0.4]));

        let ex = Examples::from_records(&rows, &groups).unwrap();

        assert_eq!(ex.feature_names(), ["v[0]", "v[1]", "s"]);
        assert_eq!(ex.features(), array![[0.1, 0.2, 1.0], [0.3, 0.4, 1.0]]);
    }

    #[test]
    fn width_drift_is_rejected() {
        let groups = FeatureGroups::new(["v"], ["a"]).unwrap();
        let mut rows = vec![record([("a", 1.0)]); 2];
        rows[0].insert("v".into(), Value::Vector(vec![0.1, 0.2]));
        rows[1].insert("v".into(), Value::Vector(vec![0.3]));

        let err = Examples::from_records(&rows, &groups).unwrap_err();
        assert!(matches!(err, DatasetErr::ShapeMismatch { got: 1, expected: 2, .. }));
    }

    #[test]
    fn diverging_row_counts_are_rejected() {
        let p = partition(
            &[record([("f1", 1.0), ("f2", 2.0), ("c0", 1.0), ("c1", 0.0), ("c2", 0.0)])],
            &groups(),
        )
        .unwrap();
        let truncated = Partitioned {
            features: p.features,
            labels: partition(&[], &groups()).unwrap().labels,
        };

        let err = Examples::from_partitioned(&truncated, 3).unwrap_err();
        assert!(matches!(err, DatasetErr::ShapeMismatch { got: 0, expected: 1, .. }));
    }
}
