use ndarray::{Array, Dimension};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::ParamGen;
use crate::Result;

/// A parameter generator that follows a certain probabilistic distribution.
#[derive(Debug, Clone, Copy)]
pub struct RandParamGen<Dist: Distribution<f64>> {
    distribution: Dist,
}

impl<Dist: Distribution<f64>> RandParamGen<Dist> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `distribution` - The distribution to sample the random numbers from.
    pub fn new(distribution: Dist) -> Self {
        Self { distribution }
    }
}

impl RandParamGen<Normal<f64>> {
    /// Creates a new `RandParamGen` parameter generator with a normal distribution.
    ///
    /// # Arguments
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(mean: f64, std_dev: f64) -> Result<Self> {
        Ok(Self::new(Normal::new(mean, std_dev)?))
    }

    /// Creates a new `RandParamGen` parameter generator that draws `scale * N(0, 1)`.
    ///
    /// # Arguments
    /// * `scale` - The factor applied to standard normal samples.
    ///
    /// # Returns
    /// An error if `scale` is not finite (Nan or infinite).
    pub fn scaled_normal(scale: f64) -> Result<Self> {
        Self::normal(0., scale)
    }
}

impl RandParamGen<Uniform<f64>> {
    /// Creates a new `RandParamGen` parameter generator with a uniform distribution.
    ///
    /// # Arguments
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(low: f64, high: f64) -> Result<Self> {
        Ok(Self::new(Uniform::new(low, high)?))
    }
}

impl<Dist: Distribution<f64>> ParamGen for RandParamGen<Dist> {
    fn generate<R, D>(&self, rng: &mut R, dim: D) -> Array<f64, D>
    where
        R: Rng,
        D: Dimension,
    {
        Array::random_using(dim, &self.distribution, rng)
    }
}
