use ndarray::{Array2, ArrayView2, Axis};

/// Row-wise softmax. Each row's max is subtracted before exponentiating so large logits
/// don't overflow.
pub fn softmax(a: ArrayView2<f64>) -> Array2<f64> {
    let max = a
        .map_axis(Axis(1), |row| row.fold(f64::NEG_INFINITY, |m, &v| m.max(v)))
        .insert_axis(Axis(1));

    let exps = (&a - &max).mapv_into(f64::exp);
    let sums = exps.sum_axis(Axis(1)).insert_axis(Axis(1));
    exps / &sums
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn rows_are_distributions() {
        let y = softmax(array![[0.3, 2.9, 4.0], [1., 1., 1.]].view());

        for row in y.rows() {
            assert!((row.sum() - 1.).abs() < 1e-12);
            assert!(row.iter().all(|&p| p >= 0.));
        }

        assert!((y[[1, 0]] - 1. / 3.).abs() < 1e-12);
        assert!((y[[0, 0]] - 0.01821127).abs() < 1e-8);
    }

    #[test]
    fn large_logits_are_stable() {
        let y = softmax(array![[1010., 1000., 990.]].view());

        assert!(y.iter().all(|p| p.is_finite()));
        assert!((y.sum() - 1.).abs() < 1e-12);
        assert!(y[[0, 0]] > 0.99);
    }

    #[test]
    fn shift_invariant() {
        let a = softmax(array![[1., 2., 3.]].view());
        let b = softmax(array![[101., 102., 103.]].view());

        assert!(a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-12));
    }
}
