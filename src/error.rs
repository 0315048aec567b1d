use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;
use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, NetErr>;

/// The network's error type.
#[derive(Debug)]
pub enum NetErr {
    /// An input or target does not fit the network's dimensions.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A mean over the batch was requested for a batch without samples.
    EmptyBatch,
    /// A class label is not below the number of classes.
    LabelOutOfRange { label: usize, classes: usize },
    /// The network configuration was rejected.
    InvalidConfig(String),
    /// A parameter distribution could not be built.
    Init(String),
    /// An array could not be assembled from its raw entries.
    Shape(ShapeError),
}

impl Display for NetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "shape mismatch for {what}: got {got}, expected {expected}"
            ),
            NetErr::EmptyBatch => write!(f, "the batch has no samples"),
            NetErr::LabelOutOfRange { label, classes } => {
                write!(f, "label {label} out of range for {classes} classes")
            }
            NetErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            NetErr::Init(msg) => write!(f, "failed to initialize parameters: {msg}"),
            NetErr::Shape(e) => write!(f, "shape error: {e}"),
        }
    }
}

impl Error for NetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NormalError> for NetErr {
    fn from(value: NormalError) -> Self {
        Self::Init(value.to_string())
    }
}

impl From<UniformError> for NetErr {
    fn from(value: UniformError) -> Self {
        Self::Init(value.to_string())
    }
}

impl From<ShapeError> for NetErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

/// Fails with `ShapeMismatch` unless `got == expected`.
pub(crate) fn ensure_dim(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(NetErr::ShapeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dim_accepts_equal() {
        assert!(ensure_dim("x columns", 3, 3).is_ok());
    }

    #[test]
    fn ensure_dim_reports_both_sides() {
        let err = ensure_dim("x columns", 4, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape mismatch for x columns: got 4, expected 3"
        );
    }

    #[test]
    fn batch_and_label_messages() {
        assert_eq!(NetErr::EmptyBatch.to_string(), "the batch has no samples");
        assert_eq!(
            NetErr::LabelOutOfRange {
                label: 7,
                classes: 3
            }
            .to_string(),
            "label 7 out of range for 3 classes"
        );
    }
}
