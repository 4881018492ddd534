//! Wall-clock limit for one pricing run.

use std::time::{Duration, Instant};

use pricer_core::types::PricingError;

/// Instant after which a pricing run gives up.
///
/// Checked between paths during simulation and between steps during backward
/// induction, so a run that outlives its caller releases its buffers soon
/// after the limit instead of running to completion.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use pricer_pricing::mc::Deadline;
///
/// let deadline = Deadline::after(Duration::from_secs(60));
/// assert!(deadline.check().is_ok());
///
/// let expired = Deadline::after(Duration::ZERO);
/// assert!(expired.check().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// A deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// The configured limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Returns `true` once the limit has elapsed.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.started.elapsed() >= self.limit
    }

    /// Fails with [`PricingError::ComputeTimeout`] once the limit has elapsed.
    #[inline]
    pub fn check(&self) -> Result<(), PricingError> {
        if self.is_expired() {
            Err(PricingError::ComputeTimeout {
                limit_ms: self.limit.as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

/// Checks an optional deadline.
#[inline]
pub(crate) fn check(deadline: Option<&Deadline>) -> Result<(), PricingError> {
    deadline.map_or(Ok(()), Deadline::check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_is_expired() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.is_expired());
        assert_eq!(
            deadline.check(),
            Err(PricingError::ComputeTimeout { limit_ms: 0 })
        );
    }

    #[test]
    fn test_generous_limit_passes() {
        let deadline = Deadline::after(Duration::from_secs(3600));
        assert!(!deadline.is_expired());
        assert_eq!(deadline.limit(), Duration::from_secs(3600));
        assert!(check(Some(&deadline)).is_ok());
        assert!(check(None).is_ok());
    }
}
