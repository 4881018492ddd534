//! Sample statistics for Monte Carlo estimators.

use crate::types::PricingError;

/// Mean, sample standard deviation and standard error of a sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStatistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected, `n - 1` denominator).
    pub std_dev: f64,
    /// Standard error of the mean: `std_dev / sqrt(n)`.
    pub std_error: f64,
    /// Number of samples.
    pub count: usize,
}

impl SampleStatistics {
    /// Minimum sample size for which the standard deviation is defined.
    pub const MIN_SAMPLES: usize = 2;

    /// Computes the statistics of `samples` in two passes.
    ///
    /// # Errors
    /// Returns [`PricingError::InsufficientSamples`] if fewer than two samples
    /// are supplied.
    pub fn from_samples(samples: &[f64]) -> Result<Self, PricingError> {
        let count = samples.len();
        if count < Self::MIN_SAMPLES {
            return Err(PricingError::InsufficientSamples {
                got: count,
                need: Self::MIN_SAMPLES,
            });
        }

        let n = count as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let sum_sq: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
        let std_dev = (sum_sq / (n - 1.0)).sqrt();

        Ok(Self {
            mean,
            std_dev,
            std_error: std_dev / n.sqrt(),
            count,
        })
    }

    /// 95% confidence interval `(mean - 1.96 se, mean + 1.96 se)`.
    pub fn confidence_95(&self) -> (f64, f64) {
        let half = 1.96 * self.std_error;
        (self.mean - half, self.mean + half)
    }
}
