use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{NetErr, Result};

/// Encodes class indices as one-hot rows of length `classes`.
///
/// # Errors
/// `LabelOutOfRange` if any label is not below `classes`.
pub fn one_hot(labels: &[usize], classes: usize) -> Result<Array2<f64>> {
    let mut t = Array2::zeros((labels.len(), classes));

    for (mut row, &label) in t.rows_mut().into_iter().zip(labels) {
        if label >= classes {
            return Err(NetErr::LabelOutOfRange { label, classes });
        }
        row[label] = 1.;
    }

    Ok(t)
}

/// Index of the largest entry of each row. Ties resolve to the first index.
pub fn argmax(a: ArrayView2<f64>) -> Array1<usize> {
    a.map_axis(Axis(1), |row| {
        let mut max_ix = 0;
        let mut max = f64::NEG_INFINITY;

        for (i, &v) in row.iter().enumerate() {
            if v > max {
                max = v;
                max_ix = i;
            }
        }

        max_ix
    })
}
