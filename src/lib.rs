pub mod arch;
pub mod config;
pub mod error;
pub mod gradient;
pub mod initialization;

pub use arch::{Grads, Params, TwoLayerNet};
pub use config::NetConfig;
pub use error::{NetErr, Result};
