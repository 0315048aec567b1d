use std::time::Instant;

use log::{debug, info};
use ndarray::{Array2, ArrayView2, Axis};
use rand::Rng;

use super::{
    activations::{sigmoid, sigmoid_grad, softmax},
    labels::argmax,
    loss::{mean_cross_entropy, softmax_cross_entropy_prime},
    params::{Grads, Params},
};
use crate::{
    NetErr, Result,
    config::NetConfig,
    error::ensure_dim,
    gradient::{numerical_gradient_with, par_numerical_gradient_with},
    initialization::{ConstParamGen, RandParamGen},
};

/// Intermediate values of a forward pass, kept around for back-propagation.
struct Forward {
    a1: Array2<f64>,
    z1: Array2<f64>,
    y: Array2<f64>,
}

/// A fully connected network with one sigmoid hidden layer and a softmax output:
///
/// `y = softmax(sigmoid(x·W1 + b1)·W2 + b2)`
///
/// Inputs are batches with one sample per row, targets are one-hot rows.
#[derive(Debug, Clone)]
pub struct TwoLayerNet {
    config: NetConfig,
    params: Params,
}

impl TwoLayerNet {
    /// Creates a new `TwoLayerNet`. Weights are drawn from `weight_init_std * N(0, 1)` and
    /// biases start at zero.
    ///
    /// # Arguments
    /// * `config` - The network's dimensions and initialization scale.
    /// * `rng` - The random number generator the weights are drawn with.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration is rejected, `Init` if the weight distribution can't
    /// be built.
    pub fn new<R: Rng>(config: NetConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let weights = RandParamGen::scaled_normal(config.weight_init_std())?;
        let params = Params::init(&config, &weights, &ConstParamGen::zeros(), rng);

        debug!(
            input = config.input_size(),
            hidden = config.hidden_size(),
            output = config.output_size(),
            params = params.size();
            "initialized two layer network"
        );

        Ok(Self { config, params })
    }

    /// Creates a `TwoLayerNet` around already existing parameters.
    ///
    /// # Errors
    /// `ShapeMismatch` if `params` doesn't fit the dimensions in `config`.
    pub fn from_params(config: NetConfig, params: Params) -> Result<Self> {
        params.ensure_fits(&config)?;
        Ok(Self { config, params })
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access for an external update rule. Values can change, shapes can't.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Computes the class probabilities of each sample.
    ///
    /// # Arguments
    /// * `x` - A `(batch, input_size)` batch.
    ///
    /// # Returns
    /// A `(batch, output_size)` array whose rows are probability distributions.
    ///
    /// # Errors
    /// `ShapeMismatch` if `x` doesn't have `input_size` columns.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.ensure_input(x)?;
        Ok(forward(&self.params, x).y)
    }

    /// Mean cross-entropy between the predictions for `x` and the one-hot targets `t`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `x` or `t` don't fit the network or each other, `EmptyBatch` if there
    /// are no samples to average over.
    pub fn loss(&self, x: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<f64> {
        self.ensure_samples(x, t)?;
        Ok(loss(&self.params, x, t))
    }

    /// Number of samples whose most likely predicted class matches the target's.
    ///
    /// NOTE: this is a count, not a ratio. Divide by the batch size for the fraction of hits.
    ///
    /// # Errors
    /// `ShapeMismatch` if `x` or `t` don't fit the network or each other.
    pub fn accuracy(&self, x: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<usize> {
        self.ensure_batch(x, t)?;

        let y = argmax(forward(&self.params, x).y.view());
        let t = argmax(t);
        Ok(y.iter().zip(&t).filter(|(a, b)| a == b).count())
    }

    /// Estimates the gradient of [`TwoLayerNet::loss`] with central differences over every
    /// parameter entry. Two loss evaluations per entry, so mind the network's size.
    ///
    /// The parameters are perturbed on a scratch copy, the network itself is left untouched.
    ///
    /// # Errors
    /// Same as [`TwoLayerNet::loss`].
    pub fn numerical_gradient(&self, x: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<Grads> {
        self.ensure_samples(x, t)?;

        let start = Instant::now();
        let f = |params: &Params| loss(params, x, t);
        let mut scratch = self.params.clone();

        let grads = Grads {
            w1: numerical_gradient_with(&mut scratch, |p| &mut p.w1, &f),
            b1: numerical_gradient_with(&mut scratch, |p| &mut p.b1, &f),
            w2: numerical_gradient_with(&mut scratch, |p| &mut p.w2, &f),
            b2: numerical_gradient_with(&mut scratch, |p| &mut p.b2, &f),
        };

        info!(
            "numerical gradient over {} parameters took {:?}",
            grads.size(),
            start.elapsed()
        );
        Ok(grads)
    }

    /// Same as [`TwoLayerNet::numerical_gradient`] but spreads the entries of each tensor over
    /// the rayon thread pool. The result is identical.
    ///
    /// # Errors
    /// Same as [`TwoLayerNet::loss`].
    pub fn par_numerical_gradient(
        &self,
        x: ArrayView2<f64>,
        t: ArrayView2<f64>,
    ) -> Result<Grads> {
        self.ensure_samples(x, t)?;

        let start = Instant::now();
        let f = |params: &Params| loss(params, x, t);
        let params = &self.params;

        let grads = Grads {
            w1: par_numerical_gradient_with(params, |p| &mut p.w1, &f)?,
            b1: par_numerical_gradient_with(params, |p| &mut p.b1, &f)?,
            w2: par_numerical_gradient_with(params, |p| &mut p.w2, &f)?,
            b2: par_numerical_gradient_with(params, |p| &mut p.b2, &f)?,
        };

        info!(
            "parallel numerical gradient over {} parameters took {:?}",
            grads.size(),
            start.elapsed()
        );
        Ok(grads)
    }

    /// Computes the gradient of [`TwoLayerNet::loss`] by back-propagation.
    ///
    /// # Errors
    /// Same as [`TwoLayerNet::loss`].
    pub fn gradient(&self, x: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<Grads> {
        self.ensure_samples(x, t)?;

        let Params { w2, .. } = &self.params;
        let Forward { a1, z1, y } = forward(&self.params, x);

        let dy = softmax_cross_entropy_prime(y.view(), t)?;
        let dz1 = dy.dot(&w2.t());
        let da1 = sigmoid_grad(a1.view()) * &dz1;

        Ok(Grads {
            w1: x.t().dot(&da1),
            b1: da1.sum_axis(Axis(0)),
            w2: z1.t().dot(&dy),
            b2: dy.sum_axis(Axis(0)),
        })
    }

    fn ensure_input(&self, x: ArrayView2<f64>) -> Result<()> {
        ensure_dim("x columns", x.ncols(), self.config.input_size())
    }

    fn ensure_batch(&self, x: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<()> {
        self.ensure_input(x)?;
        ensure_dim("t columns", t.ncols(), self.config.output_size())?;
        ensure_dim("t rows", t.nrows(), x.nrows())
    }

    /// [`TwoLayerNet::ensure_batch`] for operations averaging over the batch.
    fn ensure_samples(&self, x: ArrayView2<f64>, t: ArrayView2<f64>) -> Result<()> {
        self.ensure_batch(x, t)?;
        if x.nrows() == 0 {
            return Err(NetErr::EmptyBatch);
        }

        Ok(())
    }
}

fn forward(params: &Params, x: ArrayView2<f64>) -> Forward {
    let a1 = x.dot(&params.w1) + &params.b1;
    let z1 = sigmoid(a1.view());
    let a2 = z1.dot(&params.w2) + &params.b2;
    let y = softmax(a2.view());

    Forward { a1, z1, y }
}

fn loss(params: &Params, x: ArrayView2<f64>, t: ArrayView2<f64>) -> f64 {
    let y = forward(params, x).y;
    mean_cross_entropy(y.view(), t)
}
