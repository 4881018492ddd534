//! Error types for Monte Carlo configuration.

use pricer_core::types::PricingError;
use thiserror::Error;

use super::config::{MAX_GRID_POINTS, MAX_PATHS, MAX_STEPS, MIN_PATHS};

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur during construction when invalid parameters are
/// provided, before any simulation work starts.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Fewer paths than needed for a standard error.
    #[error("Path count {0} is below the minimum of {min}", min = MIN_PATHS)]
    TooFewPaths(usize),
    /// More paths than the engine accepts per request.
    #[error("Path count {0} exceeds the maximum of {max}", max = MAX_PATHS)]
    TooManyPaths(usize),
    /// Step count outside `[1, MAX_STEPS]`.
    #[error("Invalid step count {0}: must be in range [1, {max}]", max = MAX_STEPS)]
    InvalidStepCount(usize),
    /// `n_paths * (n_steps + 1)` exceeds the stored grid budget.
    #[error(
        "Simulation grid of {n_paths} paths x {n_steps} steps exceeds {max} price points",
        max = MAX_GRID_POINTS
    )]
    GridTooLarge {
        /// Requested path count.
        n_paths: usize,
        /// Requested step count.
        n_steps: usize,
    },
    /// A required builder field was not set.
    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::TooFewPaths(got) => PricingError::InsufficientSamples {
                got,
                need: MIN_PATHS,
            },
            ConfigError::TooManyPaths(_) => PricingError::invalid("numSims", err.to_string()),
            ConfigError::InvalidStepCount(_) | ConfigError::GridTooLarge { .. } => {
                PricingError::invalid("numSteps", err.to_string())
            }
            ConfigError::MissingParameter(name) => {
                PricingError::invalid(name, "must be specified")
            }
        }
    }
}
