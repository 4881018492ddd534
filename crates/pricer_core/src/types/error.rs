//! Error types for structured error handling.
//!
//! This module provides [`PricingError`], the taxonomy every layer of the
//! pricer maps its failures into:
//!
//! | Variant | Raised | Recovery |
//! |---------|--------|----------|
//! | `InvalidParameter` | before simulation | surfaced verbatim to the caller |
//! | `InsufficientSamples` | before simulation | surfaced verbatim to the caller |
//! | `NumericalInstability` | during regression | recovered locally by the caller |
//! | `ComputeTimeout` | service layer | fatal, no partial result |

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::invalid("rho", "must lie in [-1, 1], got 1.5");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter 'rho': must lie in [-1, 1], got 1.5"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A request parameter is outside its admissible range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as exposed to callers.
        name: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// Too few samples to compute the requested statistic.
    #[error("Insufficient samples: got {got}, need at least {need}")]
    InsufficientSamples {
        /// Number of samples supplied.
        got: usize,
        /// Minimum number of samples required.
        need: usize,
    },

    /// A numerical routine failed (ill-conditioned or non-finite system).
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// The computation exceeded its time limit.
    #[error("Computation exceeded time limit of {limit_ms} ms")]
    ComputeTimeout {
        /// The enforced limit in milliseconds.
        limit_ms: u64,
    },
}

impl PricingError {
    /// Shorthand for [`PricingError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error was raised by input validation, i.e. before
    /// any simulation work started.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidParameter { .. } | PricingError::InsufficientSamples { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = PricingError::invalid("K", "must be positive, got -5");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'K': must be positive, got -5"
        );
    }

    #[test]
    fn test_insufficient_samples_display() {
        let err = PricingError::InsufficientSamples { got: 1, need: 2 };
        assert_eq!(
            err.to_string(),
            "Insufficient samples: got 1, need at least 2"
        );
    }

    #[test]
    fn test_numerical_instability_display() {
        let err = PricingError::NumericalInstability("rank deficient".to_string());
        assert!(err.to_string().contains("rank deficient"));
    }

    #[test]
    fn test_compute_timeout_display() {
        let err = PricingError::ComputeTimeout { limit_ms: 30_000 };
        assert!(err.to_string().contains("30000 ms"));
    }

    #[test]
    fn test_rejection_classification() {
        assert!(PricingError::invalid("T", "must be positive").is_rejection());
        assert!(PricingError::InsufficientSamples { got: 0, need: 2 }.is_rejection());
        assert!(!PricingError::NumericalInstability(String::new()).is_rejection());
        assert!(!PricingError::ComputeTimeout { limit_ms: 1 }.is_rejection());
    }
}
