//! Central-difference gradient estimation.
//!
//! Every entry of a tensor is nudged by `±STEP` in turn, the scalar function is evaluated at
//! both points and `(f(w + h) - f(w - h)) / 2h` is taken as the partial derivative. It costs two
//! evaluations per entry, which makes it a slow but trustworthy reference for analytic gradients.

use log::debug;
use ndarray::{Array, Dimension, IntoDimension, indices};
use rayon::prelude::*;

use crate::Result;

/// The perturbation `h` applied to each entry.
pub const STEP: f64 = 1e-4;

/// Estimates the gradient of `f` with respect to every entry of `w`.
///
/// `w` is perturbed in place while estimating and each entry is restored before moving on to the
/// next one.
///
/// # Arguments
/// * `f` - The scalar function, evaluated at the perturbed tensor.
/// * `w` - The point to differentiate at.
///
/// # Returns
/// A tensor shaped like `w` holding the partial derivatives.
pub fn numerical_gradient<D, F>(f: F, w: &mut Array<f64, D>) -> Array<f64, D>
where
    D: Dimension,
    F: FnMut(&Array<f64, D>) -> f64,
{
    numerical_gradient_with(w, |w| w, f)
}

/// Estimates the gradient of `f` with respect to the tensor `select` picks out of `host`.
///
/// This is what allows differentiating a function of many tensors, e.g. a network's loss,
/// with respect to one of them at a time.
///
/// # Arguments
/// * `host` - The value holding the tensor, perturbed in place and restored afterwards.
/// * `select` - Projects `host` onto the tensor to differentiate with respect to.
/// * `f` - The scalar function, evaluated at the whole perturbed `host`.
///
/// # Returns
/// A tensor shaped like the selected one holding the partial derivatives.
pub fn numerical_gradient_with<T, D, S, F>(host: &mut T, select: S, mut f: F) -> Array<f64, D>
where
    D: Dimension,
    S: Fn(&mut T) -> &mut Array<f64, D>,
    F: FnMut(&T) -> f64,
{
    let dim = select(host).raw_dim();
    debug!(entries = dim.size(); "estimating numerical gradient");

    let mut grad = Array::zeros(dim.clone());
    for ix in indices(dim) {
        let ix = ix.into_dimension();
        let g = central_difference(host, &select, &mut f, ix.clone());
        grad[ix] = g;
    }

    grad
}

/// Parallel version of [`numerical_gradient_with`].
///
/// The entries are split in contiguous chunks across the rayon pool and every chunk perturbs its
/// own clone of `host`, so `host` itself is never modified. Each entry goes through the exact
/// same computation as in the sequential version, hence the results are identical.
///
/// # Errors
/// `Shape` if the estimated entries can't be assembled back into the selected tensor's shape.
pub fn par_numerical_gradient_with<T, D, S, F>(host: &T, select: S, f: F) -> Result<Array<f64, D>>
where
    T: Clone + Sync,
    D: Dimension,
    S: Fn(&mut T) -> &mut Array<f64, D> + Sync,
    F: Fn(&T) -> f64 + Sync,
{
    let dim = select(&mut host.clone()).raw_dim();
    let ixs: Vec<D> = indices(dim.clone())
        .into_iter()
        .map(IntoDimension::into_dimension)
        .collect();

    let chunk_size = ixs.len().div_ceil(rayon::current_num_threads()).max(1);
    debug!(
        entries = ixs.len(),
        chunk_size = chunk_size;
        "estimating numerical gradient in parallel"
    );

    let chunks: Vec<Vec<f64>> = ixs
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut local = host.clone();
            let mut eval = |t: &T| f(t);

            chunk
                .iter()
                .map(|ix| central_difference(&mut local, &select, &mut eval, ix.clone()))
                .collect::<Vec<f64>>()
        })
        .collect();

    Ok(Array::from_shape_vec(dim, chunks.concat())?)
}

fn central_difference<T, D, S, F>(host: &mut T, select: &S, f: &mut F, ix: D) -> f64
where
    D: Dimension,
    S: Fn(&mut T) -> &mut Array<f64, D>,
    F: FnMut(&T) -> f64,
{
    let orig = select(host)[ix.clone()];

    select(host)[ix.clone()] = orig + STEP;
    let fxh1 = f(&*host);

    select(host)[ix.clone()] = orig - STEP;
    let fxh2 = f(&*host);

    select(host)[ix] = orig;
    (fxh1 - fxh2) / (2. * STEP)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2, array};

    use super::*;

    fn sum_of_squares<D: Dimension>(w: &Array<f64, D>) -> f64 {
        w.mapv(|v| v * v).sum()
    }

    #[test]
    fn gradient_of_sum_of_squares() {
        let mut w = array![3., 4.];
        let grad = numerical_gradient(sum_of_squares, &mut w);

        assert!((grad[0] - 6.).abs() < 1e-6);
        assert!((grad[1] - 8.).abs() < 1e-6);
    }

    #[test]
    fn gradient_over_three_axes() {
        let mut w = Array::from_shape_fn((2, 3, 2), |(i, j, k)| (i + 2 * j) as f64 - k as f64);
        let before = w.clone();

        let grad = numerical_gradient(sum_of_squares, &mut w);

        assert_eq!(grad.dim(), (2, 3, 2));
        assert_eq!(w, before);
        for (g, v) in grad.iter().zip(&before) {
            assert!((g - 2. * v).abs() < 1e-6);
        }
    }

    #[test]
    fn restores_the_point() {
        let mut w = array![[0.5, -1.5], [2., 0.25]];
        let before = w.clone();

        let grad = numerical_gradient(sum_of_squares, &mut w);

        assert_eq!(w, before);
        assert_eq!(grad.dim(), (2, 2));
        for (g, v) in grad.iter().zip(&before) {
            assert!((g - 2. * v).abs() < 1e-6);
        }
    }

    #[test]
    fn selects_one_tensor_of_many() {
        let mut host = (array![1., 2.], array![[1., 0.], [0., 1.]]);
        let f = |(b, w): &(Array1<f64>, Array2<f64>)| w.dot(b).sum();

        let grad_b = numerical_gradient_with(&mut host, |h| &mut h.0, f);
        let grad_w = numerical_gradient_with(&mut host, |h| &mut h.1, f);

        assert!((grad_b - array![1., 1.]).iter().all(|d| d.abs() < 1e-6));
        assert!(
            (grad_w - array![[1., 2.], [1., 2.]])
                .iter()
                .all(|d| d.abs() < 1e-6)
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut w = Array2::from_shape_fn((7, 5), |(i, j)| (i as f64 - 3.) * 0.1 + j as f64);
        let f = |w: &Array2<f64>| w.mapv(f64::sin).sum();

        let par = par_numerical_gradient_with(&w, |w| w, f).unwrap();
        let seq = numerical_gradient(f, &mut w);

        assert_eq!(par, seq);
    }
}
