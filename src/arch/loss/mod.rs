mod cross_entropy;

pub(crate) use cross_entropy::mean_cross_entropy;
pub use cross_entropy::{EPSILON, cross_entropy_error, softmax_cross_entropy_prime};
