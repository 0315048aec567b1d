mod sigmoid;
mod softmax;

pub use sigmoid::{sigmoid, sigmoid_grad};
pub use softmax::softmax;
