use ndarray::{Array, Dimension};
use rand::Rng;

/// A `ParamGen` generates values for the initial state of the network's parameters.
pub trait ParamGen {
    /// Should generate a tensor of shape `dim`.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to draw from, if needed.
    /// * `dim` - The shape of the tensor.
    ///
    /// # Returns
    /// A freshly allocated tensor.
    fn generate<R, D>(&self, rng: &mut R, dim: D) -> Array<f64, D>
    where
        R: Rng,
        D: Dimension;
}
