use ndarray::{Array, Dimension};
use rand::Rng;

use super::ParamGen;

/// A parameter generator that always generates the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstParamGen {
    value: f64,
}

impl ConstParamGen {
    /// Creates a new `ConstParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `value` - The value to always generate.
    ///
    /// # Returns
    /// A new `ConstParamGen` instance.
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// A generator of zeros, the usual choice for biases.
    pub fn zeros() -> Self {
        Self::new(0.)
    }
}

impl ParamGen for ConstParamGen {
    fn generate<R, D>(&self, _rng: &mut R, dim: D) -> Array<f64, D>
    where
        R: Rng,
        D: Dimension,
    {
        Array::from_elem(dim, self.value)
    }
}
