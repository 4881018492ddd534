//! European exercise by discounted payoff averaging.

use pricer_core::math::statistics::SampleStatistics;
use pricer_core::types::{OptionType, PricingError};
use rayon::prelude::*;

use super::request::SimulationRequest;

/// Monte Carlo estimate with its standard error.
///
/// `std_error` is the standard error of the mean: the Bessel-corrected sample
/// standard deviation of the discounted payoffs divided by `sqrt(n)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PriceEstimate {
    /// Present value.
    pub price: f64,
    /// Standard error of the price estimate.
    pub std_error: f64,
}

impl PriceEstimate {
    /// Estimate from discounted per-path values.
    ///
    /// # Errors
    /// [`PricingError::InsufficientSamples`] if fewer than two values.
    pub fn from_samples(samples: &[f64]) -> Result<Self, PricingError> {
        let stats = SampleStatistics::from_samples(samples)?;
        Ok(Self {
            price: stats.mean,
            std_error: stats.std_error,
        })
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }
}

/// Prices a European option from terminal prices.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionType;
/// use pricer_pricing::mc::EuropeanPricer;
///
/// let pricer = EuropeanPricer::new(OptionType::Call, 100.0, 0.0, 1.0);
/// let estimate = pricer.price(&[90.0, 110.0, 120.0, 100.0]).unwrap();
/// assert!((estimate.price - 7.5).abs() < 1e-12);
///
/// assert!(pricer.price(&[105.0]).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EuropeanPricer {
    option_type: OptionType,
    strike: f64,
    discount: f64,
}

impl EuropeanPricer {
    /// Creates a pricer discounting at `exp(-rate * time_to_expiry)`.
    pub fn new(option_type: OptionType, strike: f64, rate: f64, time_to_expiry: f64) -> Self {
        Self {
            option_type,
            strike,
            discount: (-rate * time_to_expiry).exp(),
        }
    }

    /// Creates the pricer for a request.
    pub fn for_request(request: &SimulationRequest) -> Self {
        Self::new(
            request.option_type(),
            request.strike(),
            request.risk_free_rate(),
            request.time_to_expiry(),
        )
    }

    /// Discounted payoff of a single terminal price.
    #[inline]
    pub fn discounted_payoff(&self, terminal: f64) -> f64 {
        self.discount * self.option_type.intrinsic(terminal, self.strike)
    }

    /// Price and standard error over all terminal prices.
    ///
    /// # Errors
    /// [`PricingError::InsufficientSamples`] if fewer than two prices.
    pub fn price(&self, terminal_prices: &[f64]) -> Result<PriceEstimate, PricingError> {
        let payoffs: Vec<f64> = terminal_prices
            .par_iter()
            .map(|&s| self.discounted_payoff(s))
            .collect();
        PriceEstimate::from_samples(&payoffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_put_payoff_and_discount() {
        let pricer = EuropeanPricer::new(OptionType::Put, 100.0, 0.05, 2.0);
        let disc = (-0.1_f64).exp();
        assert_relative_eq!(pricer.discounted_payoff(80.0), 20.0 * disc, epsilon = 1e-12);
        assert_eq!(pricer.discounted_payoff(120.0), 0.0);
    }

    #[test]
    fn test_standard_error_of_mean() {
        let pricer = EuropeanPricer::new(OptionType::Call, 0.0, 0.0, 1.0);
        // Payoffs equal the terminal prices when K = 0 and r = 0.
        let estimate = pricer.price(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(estimate.price, 2.5);
        let sd = (5.0_f64 / 3.0).sqrt();
        assert_relative_eq!(estimate.std_error, sd / 2.0, epsilon = 1e-12);
        assert_relative_eq!(estimate.confidence_95(), 1.96 * sd / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_insufficient_samples() {
        let pricer = EuropeanPricer::new(OptionType::Call, 100.0, 0.0, 1.0);
        assert_eq!(
            pricer.price(&[]).unwrap_err(),
            PricingError::InsufficientSamples { got: 0, need: 2 }
        );
    }

    #[test]
    fn test_out_of_the_money_everywhere() {
        let pricer = EuropeanPricer::new(OptionType::Call, 1_000.0, 0.05, 1.0);
        let estimate = pricer.price(&[90.0, 100.0, 110.0]).unwrap();
        assert_eq!(estimate, PriceEstimate::default());
    }
}
