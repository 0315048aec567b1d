use ndarray::{Array2, ArrayView2};

use crate::{Result, error::ensure_dim};

/// Added inside the logarithm so a zero probability doesn't produce `-inf`.
pub const EPSILON: f64 = 1e-7;

/// Mean cross-entropy between the predicted distributions `y` and the one-hot targets `t`,
/// that is, `-Σ t·ln(y + ε)` divided by the number of rows. An empty batch gives NaN.
///
/// # Errors
/// `ShapeMismatch` if `y` and `t` differ in shape.
pub fn cross_entropy_error(y: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<f64> {
    ensure_same_shape(y, t)?;
    Ok(mean_cross_entropy(y, t))
}

/// Derivative of `cross_entropy_error(softmax(a), t)` with respect to the logits `a`, given
/// the softmax output `y`.
///
/// # Errors
/// `ShapeMismatch` if `y` and `t` differ in shape.
pub fn softmax_cross_entropy_prime(y: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<Array2<f64>> {
    ensure_same_shape(y, t)?;

    let batch_size = y.nrows() as f64;
    Ok((&y - &t) / batch_size)
}

/// [`cross_entropy_error`] for callers that already checked the shapes.
pub(crate) fn mean_cross_entropy(y: ArrayView2<f64>, t: ArrayView2<f64>) -> f64 {
    let batch_size = y.nrows() as f64;
    let total: f64 = y
        .iter()
        .zip(t.iter())
        .map(|(&p, &q)| q * (p + EPSILON).ln())
        .sum();

    -total / batch_size
}

fn ensure_same_shape(y: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<()> {
    ensure_dim("t rows", t.nrows(), y.nrows())?;
    ensure_dim("t columns", t.ncols(), y.ncols())
}
