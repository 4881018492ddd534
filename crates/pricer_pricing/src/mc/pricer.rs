//! Monte Carlo pricing engine.
//!
//! [`HestonPricer`] runs one request end to end:
//! 1. Dividend mapping onto the grid (via [`DividendAdjuster`])
//! 2. Path generation (via [`PathSimulator`])
//! 3. European valuation (via [`EuropeanPricer`])
//! 4. American valuation (via [`LongstaffSchwartz`])
//! 5. Packaging (via [`ResultAggregator`])
//!
//! The request is validated when it is built, so no simulation work starts
//! for an invalid request.

use std::time::{Duration, Instant};

use pricer_core::types::{OptionType, PricingError};
use pricer_models::analytical::BlackScholes;
use tracing::{debug, warn};

use super::american::LongstaffSchwartz;
use super::deadline::Deadline;
use super::dividends::DividendAdjuster;
use super::european::EuropeanPricer;
use super::paths::PathSimulator;
use super::request::SimulationRequest;
use super::result::{PricingResult, ResultAggregator};

/// Heston Monte Carlo pricer for European and American options.
///
/// Stateless apart from its settings; one instance can serve concurrent
/// requests. With a time limit set, each run checks its own deadline and
/// fails with [`PricingError::ComputeTimeout`] instead of running on.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionType;
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{HestonPricer, MonteCarloConfig, SimulationRequest};
///
/// let request = SimulationRequest::builder()
///     .option_type(OptionType::Put)
///     .spot(100.0)
///     .strike(100.0)
///     .time_to_expiry(0.5)
///     .risk_free_rate(0.05)
///     .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
///     .config(MonteCarloConfig::builder().n_paths(2_000).n_steps(25).seed(7).build().unwrap())
///     .build()
///     .unwrap();
///
/// let result = HestonPricer::new().price(&request).unwrap();
/// assert!(result.european.price > 0.0);
/// assert!(result.american.std_error > 0.0);
/// assert_eq!(result.sample_paths.len(), 100);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct HestonPricer {
    aggregator: ResultAggregator,
    time_limit: Option<Duration>,
}

impl HestonPricer {
    /// Creates a pricer with the default aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pricer with a custom aggregator.
    pub fn with_aggregator(aggregator: ResultAggregator) -> Self {
        Self {
            aggregator,
            time_limit: None,
        }
    }

    /// Limits each pricing run to `limit` of wall-clock time.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// The per-run time limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Prices `request`.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidParameter`] if the random streams cannot
    /// be built and [`PricingError::InsufficientSamples`] if either estimator
    /// has fewer than two samples, and [`PricingError::ComputeTimeout`] if the
    /// time limit passes. Regression failures inside the American
    /// pricer are recovered locally and reported in the result.
    pub fn price(&self, request: &SimulationRequest) -> Result<PricingResult, PricingError> {
        let started = Instant::now();
        let deadline = self.time_limit.map(Deadline::after);

        let adjuster = DividendAdjuster::new(
            request.dividends(),
            request.time_to_expiry(),
            request.n_steps(),
        );
        let paths = PathSimulator::new(request, &adjuster)?
            .with_deadline(deadline)
            .simulate()?;

        let european = EuropeanPricer::for_request(request).price(&paths.terminal_prices())?;
        let american = LongstaffSchwartz::for_request(request)
            .with_deadline(deadline)
            .price(&paths)?;

        if request.option_type() == OptionType::Put
            && adjuster.is_empty()
            && american.estimate.price < european.price
        {
            warn!(
                american = american.estimate.price,
                european = european.price,
                "american put priced below european"
            );
        }

        let black_scholes = black_scholes_reference(request, &adjuster);

        debug!(
            option_type = %request.option_type(),
            n_paths = paths.n_paths(),
            n_steps = paths.n_steps(),
            seed = request.seed(),
            dividends = adjuster.applied().len(),
            european = european.price,
            american = american.estimate.price,
            early_exercises = american.early_exercise_count,
            fallbacks = american.fallbacks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "heston simulation complete"
        );

        Ok(self.aggregator.aggregate(
            request,
            &paths,
            &adjuster,
            european,
            american,
            black_scholes,
        ))
    }
}

/// Black-Scholes price at flat volatility `sqrt(theta_var)`.
///
/// Discrete dividends enter as the continuous yield `q` with
/// `S * (1 - exp(-q T)) = PV(dividends)`. Returns `None` when the long-run
/// variance is zero or the dividends are worth at least the spot.
pub fn black_scholes_reference(
    request: &SimulationRequest,
    adjuster: &DividendAdjuster,
) -> Option<f64> {
    let spot = request.spot();
    let rate = request.risk_free_rate();
    let expiry = request.time_to_expiry();

    let pv = adjuster.present_value(rate);
    if pv >= spot {
        return None;
    }
    let dividend_yield = -(1.0 - pv / spot).ln() / expiry;

    let model = BlackScholes::new(spot, rate, request.heston().long_run_volatility())
        .ok()?
        .with_dividend_yield(dividend_yield);
    Some(model.price(request.option_type(), request.strike(), expiry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::config::MonteCarloConfig;
    use approx::assert_relative_eq;
    use pricer_models::dividends::DividendEvent;
    use pricer_models::models::HestonParams;

    fn request(option_type: OptionType, dividends: Vec<DividendEvent>) -> SimulationRequest {
        SimulationRequest::builder()
            .option_type(option_type)
            .spot(100.0)
            .strike(100.0)
            .time_to_expiry(1.0)
            .risk_free_rate(0.05)
            .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
            .dividends(dividends)
            .config(
                MonteCarloConfig::builder()
                    .n_paths(1_000)
                    .n_steps(20)
                    .seed(11)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let req = request(OptionType::Call, Vec::new());
        let a = HestonPricer::new().price(&req).unwrap();
        let b = HestonPricer::new().price(&req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_limit_stops_run() {
        let req = request(OptionType::Put, Vec::new());
        let pricer = HestonPricer::new().with_time_limit(Duration::ZERO);
        assert_eq!(pricer.time_limit(), Some(Duration::ZERO));
        assert_eq!(
            pricer.price(&req),
            Err(PricingError::ComputeTimeout { limit_ms: 0 })
        );

        let relaxed = HestonPricer::new().with_time_limit(Duration::from_secs(600));
        assert_eq!(
            relaxed.price(&req).unwrap(),
            HestonPricer::new().price(&req).unwrap()
        );
    }

    #[test]
    fn test_result_metadata() {
        let result = HestonPricer::new()
            .price(&request(OptionType::Call, vec![DividendEvent::new(0.5, 1.0)]))
            .unwrap();
        assert_eq!(result.total_paths, 1_000);
        assert_eq!(result.num_steps, 20);
        assert_eq!(result.sample_paths.len(), 100);
        assert_eq!(result.sample_paths[0].len(), 21);
        assert_eq!(result.dividend_summary.num_dividends, 1);
        assert_eq!(result.dividend_summary.dividends_in_period[0].step, 10);
        assert!(result.black_scholes_price.is_some());
    }

    #[test]
    fn test_dividends_lower_call_price() {
        let plain = HestonPricer::new()
            .price(&request(OptionType::Call, Vec::new()))
            .unwrap();
        let with_div = HestonPricer::new()
            .price(&request(OptionType::Call, vec![DividendEvent::new(0.5, 5.0)]))
            .unwrap();
        assert!(with_div.european.price < plain.european.price);
    }

    #[test]
    fn test_black_scholes_reference_without_dividends() {
        let req = request(OptionType::Call, Vec::new());
        let adjuster = DividendAdjuster::none(req.n_steps());
        let reference = black_scholes_reference(&req, &adjuster).unwrap();
        let direct = BlackScholes::new(100.0, 0.05, 0.2)
            .unwrap()
            .price_call(100.0, 1.0);
        assert_relative_eq!(reference, direct, epsilon = 1e-12);
    }

    #[test]
    fn test_black_scholes_reference_undefined() {
        let req = SimulationRequest::builder()
            .option_type(OptionType::Call)
            .spot(100.0)
            .strike(100.0)
            .time_to_expiry(1.0)
            .heston(HestonParams::new(2.0, 0.0, 0.3, -0.7, 0.04).unwrap())
            .config(MonteCarloConfig::builder().n_paths(10).n_steps(4).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(black_scholes_reference(&req, &DividendAdjuster::none(4)), None);

        let req = request(OptionType::Call, vec![DividendEvent::new(0.5, 150.0)]);
        let adjuster = DividendAdjuster::new(req.dividends(), 1.0, req.n_steps());
        assert_eq!(black_scholes_reference(&req, &adjuster), None);
    }
}
