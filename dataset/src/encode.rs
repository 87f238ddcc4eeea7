use rayon::prelude::*;

use crate::{
    error::{DatasetErr, Result},
    partition::ColumnBatch,
};

/// Returns the index of the maximum of `xs`, or `None` if it is empty.
///
/// Ties resolve to the lowest index. A NaN compares above every number, so the first NaN wins.
pub fn argmax(xs: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, &x) in xs.iter().enumerate() {
        match best {
            Some((_, b)) if b.is_nan() => break,
            Some((_, b)) if !(x.is_nan() || x > b) => {}
            _ => best = Some((i, x)),
        }
    }

    best.map(|(i, _)| i)
}

/// Collapses a one-hot label into its class index.
///
/// # Errors
/// `EmptyLabel` if `one_hot_row` is empty.
pub fn encode(one_hot_row: &[f64]) -> Result<usize> {
    argmax(one_hot_row).ok_or(DatasetErr::EmptyLabel { row: None })
}

/// Encodes every row of a label batch into its class index.
///
/// Rows are encoded in parallel; the output keeps the batch's row order.
///
/// # Arguments
/// * `labels` - The label columns, one per class.
/// * `num_classes` - The expected amount of label columns.
///
/// # Errors
/// `ShapeMismatch` if there are not `num_classes` columns or a label cell is not a scalar.
pub fn encode_labels(labels: &ColumnBatch, num_classes: usize) -> Result<Vec<usize>> {
    if labels.num_columns() != num_classes {
        return Err(DatasetErr::ShapeMismatch {
            what: "label columns".into(),
            got: labels.num_columns(),
            expected: num_classes,
        });
    }

    (0..labels.num_rows())
        .into_par_iter()
        .map(|row| encode_row(labels, row))
        .collect()
}

fn encode_row(labels: &ColumnBatch, row: usize) -> Result<usize> {
    let mut one_hot = Vec::with_capacity(labels.num_columns());

    for (column, value) in labels.columns().iter().zip(labels.row(row)) {
        let x = value.as_scalar().ok_or_else(|| DatasetErr::ShapeMismatch {
            what: format!("label '{}' at row {row}", column.name()),
            got: value.width(),
            expected: 1,
        })?;
        one_hot.push(x);
    }

    argmax(&one_hot).ok_or(DatasetErr::EmptyLabel { row: Some(row) })
}
