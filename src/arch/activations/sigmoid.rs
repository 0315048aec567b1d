use ndarray::{Array, ArrayView, Dimension};

fn f(z: f64) -> f64 {
    1. / (1. + (-z).exp())
}

/// Elementwise logistic function `1 / (1 + e^-a)`.
pub fn sigmoid<D: Dimension>(a: ArrayView<f64, D>) -> Array<f64, D> {
    a.mapv(f)
}

/// Elementwise derivative of the logistic function evaluated at `a`.
pub fn sigmoid_grad<D: Dimension>(a: ArrayView<f64, D>) -> Array<f64, D> {
    a.mapv(|z| {
        let s = f(z);
        s * (1. - s)
    })
}
