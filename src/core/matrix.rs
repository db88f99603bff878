use ndarray::{Array2, ArrayView1};

/// Dense feature matrix produced by the preprocessing transform, one row per
/// sample.
pub type Matrix = Array2<f64>;

/// One encoded sample.
pub type RowView<'a> = ArrayView1<'a, f64>;

/// Stacks equal-length rows; ragged input is a shape error.
#[cfg(test)]
pub(crate) fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<Matrix, ndarray::ShapeError> {
    let n_cols = rows.first().map_or(0, Vec::len);
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat)
}
