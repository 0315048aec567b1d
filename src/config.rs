use std::{env, num::NonZeroUsize, str::FromStr};

use crate::{NetErr, Result};

/// Standard deviation used for the initial weights when none is given.
pub const DEFAULT_WEIGHT_INIT_STD: f64 = 0.01;

const DEFAULT_INPUT_SIZE: usize = 784;
const DEFAULT_HIDDEN_SIZE: usize = 100;
const DEFAULT_OUTPUT_SIZE: usize = 10;

/// Immutable dimensions and initialization scale of a `TwoLayerNet`.
#[derive(Debug, Clone, PartialEq)]
pub struct NetConfig {
    input_size: NonZeroUsize,
    hidden_size: NonZeroUsize,
    output_size: NonZeroUsize,
    weight_init_std: f64,
}

impl NetConfig {
    /// Creates a new network configuration with the default weight scale.
    ///
    /// # Args
    /// * `input_size` - Number of features per sample.
    /// * `hidden_size` - Number of hidden units.
    /// * `output_size` - Number of classes.
    ///
    /// # Returns
    /// A `NetConfig` instance.
    pub fn new(
        input_size: NonZeroUsize,
        hidden_size: NonZeroUsize,
        output_size: NonZeroUsize,
    ) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            weight_init_std: DEFAULT_WEIGHT_INIT_STD,
        }
    }

    /// Replaces the standard deviation the weights are drawn with.
    pub fn with_weight_init_std(mut self, weight_init_std: f64) -> Self {
        self.weight_init_std = weight_init_std;
        self
    }

    /// Builds a configuration from `INPUT_SIZE`, `HIDDEN_SIZE`, `OUTPUT_SIZE` and
    /// `WEIGHT_INIT_STD`, falling back to a 784-100-10 network with a 0.01 scale.
    ///
    /// # Errors
    /// `InvalidConfig` if a variable is set but does not parse, a size is zero or the
    /// scale is not a positive finite number.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            input_size: nonzero_var("INPUT_SIZE", DEFAULT_INPUT_SIZE)?,
            hidden_size: nonzero_var("HIDDEN_SIZE", DEFAULT_HIDDEN_SIZE)?,
            output_size: nonzero_var("OUTPUT_SIZE", DEFAULT_OUTPUT_SIZE)?,
            weight_init_std: var_or("WEIGHT_INIT_STD", DEFAULT_WEIGHT_INIT_STD)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the sizes' types can't express.
    ///
    /// # Errors
    /// `InvalidConfig` if `weight_init_std` is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        let std = self.weight_init_std;
        if !std.is_finite() || std <= 0. {
            return Err(NetErr::InvalidConfig(format!(
                "weight_init_std must be positive and finite, got {std}"
            )));
        }

        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.input_size.get()
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size.get()
    }

    pub fn output_size(&self) -> usize {
        self.output_size.get()
    }

    pub fn weight_init_std(&self) -> f64 {
        self.weight_init_std
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| NetErr::InvalidConfig(format!("{key} has an invalid value: {raw:?}"))),
        Err(_) => Ok(default),
    }
}

fn nonzero_var(key: &str, default: usize) -> Result<NonZeroUsize> {
    let value = var_or(key, default)?;
    NonZeroUsize::new(value)
        .ok_or_else(|| NetErr::InvalidConfig(format!("{key} must be positive")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn defaults_to_small_scale() {
        let config = NetConfig::new(nz(2), nz(3), nz(2));

        assert_eq!(config.weight_init_std(), DEFAULT_WEIGHT_INIT_STD);
        assert_eq!(
            (config.input_size(), config.hidden_size(), config.output_size()),
            (2, 3, 2)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_std() {
        for std in [0., -0.5, f64::NAN, f64::INFINITY] {
            let config = NetConfig::new(nz(2), nz(3), nz(2)).with_weight_init_std(std);
            assert!(matches!(config.validate(), Err(NetErr::InvalidConfig(_))));
        }
    }

    #[test]
    fn unset_var_falls_back() {
        let value = var_or("TWO_LAYER_NET_SURELY_UNSET", 7usize).unwrap();
        assert_eq!(value, 7);
    }
}
