use ndarray::{Array1, Array2, ArrayViewD, ArrayViewMut1, ArrayViewMut2, Ix1, Ix2};
use rand::Rng;

use crate::{Result, config::NetConfig, error::ensure_dim, initialization::ParamGen};

/// The four tensors of a two-layer network.
///
/// The same record carries gradients, see [`Grads`]. Shapes are fixed once built: the mutable
/// accessors hand out views, which can change values but never shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub(crate) w1: Array2<f64>,
    pub(crate) b1: Array1<f64>,
    pub(crate) w2: Array2<f64>,
    pub(crate) b2: Array1<f64>,
}

/// Gradients share the parameters' layout, one tensor per parameter.
pub type Grads = Params;

impl Params {
    /// Creates the parameters of a network shaped after `config`.
    ///
    /// # Arguments
    /// * `config` - The network's dimensions.
    /// * `weights` - Generator for `w1` and `w2`.
    /// * `biases` - Generator for `b1` and `b2`.
    /// * `rng` - The random number generator handed to the generators.
    ///
    /// # Returns
    /// A new `Params` instance.
    pub fn init<W, B, R>(config: &NetConfig, weights: &W, biases: &B, rng: &mut R) -> Self
    where
        W: ParamGen,
        B: ParamGen,
        R: Rng,
    {
        let (input, hidden, output) = (
            config.input_size(),
            config.hidden_size(),
            config.output_size(),
        );

        Self {
            w1: weights.generate(rng, Ix2(input, hidden)),
            b1: biases.generate(rng, Ix1(hidden)),
            w2: weights.generate(rng, Ix2(hidden, output)),
            b2: biases.generate(rng, Ix1(output)),
        }
    }

    /// Assembles parameters from existing tensors.
    ///
    /// # Errors
    /// `ShapeMismatch` if the tensors can't be chained into `x·w1 + b1 → ·w2 + b2`.
    pub fn from_parts(
        w1: Array2<f64>,
        b1: Array1<f64>,
        w2: Array2<f64>,
        b2: Array1<f64>,
    ) -> Result<Self> {
        ensure_dim("b1 length", b1.len(), w1.ncols())?;
        ensure_dim("w2 rows", w2.nrows(), w1.ncols())?;
        ensure_dim("b2 length", b2.len(), w2.ncols())?;

        Ok(Self { w1, b1, w2, b2 })
    }

    /// Checks that these parameters belong to a network shaped after `config`.
    pub(crate) fn ensure_fits(&self, config: &NetConfig) -> Result<()> {
        ensure_dim("w1 rows", self.w1.nrows(), config.input_size())?;
        ensure_dim("w1 columns", self.w1.ncols(), config.hidden_size())?;
        ensure_dim("b1 length", self.b1.len(), config.hidden_size())?;
        ensure_dim("w2 rows", self.w2.nrows(), config.hidden_size())?;
        ensure_dim("w2 columns", self.w2.ncols(), config.output_size())?;
        ensure_dim("b2 length", self.b2.len(), config.output_size())
    }

    pub fn w1(&self) -> &Array2<f64> {
        &self.w1
    }

    pub fn b1(&self) -> &Array1<f64> {
        &self.b1
    }

    pub fn w2(&self) -> &Array2<f64> {
        &self.w2
    }

    pub fn b2(&self) -> &Array1<f64> {
        &self.b2
    }

    pub fn w1_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.w1.view_mut()
    }

    pub fn b1_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.b1.view_mut()
    }

    pub fn w2_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.w2.view_mut()
    }

    pub fn b2_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.b2.view_mut()
    }

    /// Returns the amount of scalar parameters.
    pub fn size(&self) -> usize {
        self.w1.len() + self.b1.len() + self.w2.len() + self.b2.len()
    }

    /// The largest absolute difference between matching entries of `self` and `other`, or
    /// infinity if any of the tensors differ in shape.
    pub fn max_abs_diff(&self, other: &Params) -> f64 {
        self.tensors()
            .iter()
            .zip(other.tensors().iter())
            .map(|(a, b)| {
                if a.shape() != b.shape() {
                    return f64::INFINITY;
                }

                a.iter()
                    .zip(b.iter())
                    .fold(0., |max: f64, (x, y)| max.max((x - y).abs()))
            })
            .fold(0., f64::max)
    }

    fn tensors(&self) -> [ArrayViewD<'_, f64>; 4] {
        [
            self.w1.view().into_dyn(),
            self.b1.view().into_dyn(),
            self.w2.view().into_dyn(),
            self.b2.view().into_dyn(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use ndarray::{Array, array};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        NetErr,
        initialization::{ConstParamGen, RandParamGen},
    };

    fn config(input: usize, hidden: usize, output: usize) -> NetConfig {
        NetConfig::new(
            NonZeroUsize::new(input).unwrap(),
            NonZeroUsize::new(hidden).unwrap(),
            NonZeroUsize::new(output).unwrap(),
        )
    }

    #[test]
    fn init_shapes() {
        let params = Params::init(
            &config(4, 3, 2),
            &RandParamGen::scaled_normal(0.01).unwrap(),
            &ConstParamGen::zeros(),
            &mut StdRng::seed_from_u64(7),
        );

        assert_eq!(params.w1().dim(), (4, 3));
        assert_eq!(params.b1().dim(), 3);
        assert_eq!(params.w2().dim(), (3, 2));
        assert_eq!(params.b2().dim(), 2);
        assert_eq!(params.size(), 4 * 3 + 3 + 3 * 2 + 2);
        assert!(params.b1().iter().chain(params.b2()).all(|&b| b == 0.));
        assert!(params.ensure_fits(&config(4, 3, 2)).is_ok());
        assert!(params.ensure_fits(&config(4, 5, 2)).is_err());
    }

    #[test]
    fn from_parts_checks_chain() {
        let ok = Params::from_parts(
            Array::zeros((2, 3)),
            Array::zeros(3),
            Array::zeros((3, 2)),
            Array::zeros(2),
        );
        assert!(ok.is_ok());

        let err = Params::from_parts(
            Array::zeros((2, 3)),
            Array::zeros(3),
            Array::zeros((4, 2)),
            Array::zeros(2),
        );
        assert!(matches!(
            err,
            Err(NetErr::ShapeMismatch {
                what: "w2 rows",
                got: 4,
                expected: 3
            })
        ));
    }

    #[test]
    fn views_mutate_in_place() {
        let mut params = Params::from_parts(
            Array::zeros((1, 1)),
            Array::zeros(1),
            Array::zeros((1, 2)),
            Array::zeros(2),
        )
        .unwrap();

        params.b2_mut()[1] = 0.5;
        params.w1_mut().fill(2.);

        assert_eq!(params.b2(), &array![0., 0.5]);
        assert_eq!(params.w1(), &array![[2.]]);
    }

    #[test]
    fn max_abs_diff() {
        let a = Params::from_parts(
            array![[1., 2.]],
            array![0., 0.],
            array![[1.], [1.]],
            array![0.],
        )
        .unwrap();
        let mut b = a.clone();

        assert_eq!(a.max_abs_diff(&b), 0.);

        b.w2_mut()[[1, 0]] = 0.75;
        b.b1_mut()[0] = -0.1;
        assert_eq!(a.max_abs_diff(&b), 0.25);
    }
}
