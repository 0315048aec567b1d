pub mod activations;
pub mod labels;
pub mod loss;
mod params;
mod two_layer;

pub use params::{Grads, Params};
pub use two_layer::TwoLayerNet;
