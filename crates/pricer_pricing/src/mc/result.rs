//! Result packaging.

use pricer_models::dividends::ForecastDividend;

use super::american::{AmericanEstimate, RegressionFallback};
use super::dividends::{AppliedDividend, DividendAdjuster};
use super::european::PriceEstimate;
use super::paths::SimulatedPaths;
use super::request::SimulationRequest;

/// Maximum number of price paths returned with a result.
pub const MAX_SAMPLE_PATHS: usize = 100;

/// Dividends that affected a pricing run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DividendSummary {
    /// Dividends placed on the simulation grid, in time order.
    pub dividends_in_period: Vec<AppliedDividend>,
    /// Payments projected from dividend history.
    pub forecast_dividends: Vec<ForecastDividend>,
    /// Sum of `dividends_in_period` amounts.
    pub total_dividends: f64,
    /// Number of `dividends_in_period`.
    pub num_dividends: usize,
}

/// Output of one pricing run.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingResult {
    /// European price and standard error.
    pub european: PriceEstimate,
    /// American (Longstaff-Schwartz) price and standard error.
    pub american: PriceEstimate,
    /// The first simulated price paths, at most [`MAX_SAMPLE_PATHS`].
    pub sample_paths: Vec<Vec<f64>>,
    /// Dividend summary.
    pub dividend_summary: DividendSummary,
    /// Initial volatility `sqrt(v0)`.
    pub volatility: f64,
    /// Number of simulated paths.
    pub total_paths: usize,
    /// Number of time steps.
    pub num_steps: usize,
    /// Black-Scholes price at flat volatility `sqrt(theta_var)`, if defined.
    pub black_scholes_price: Option<f64>,
    /// Paths exercised before expiry by the American pricer.
    pub early_exercise_count: usize,
    /// Steps at which the American regression was skipped.
    pub regression_fallbacks: Vec<RegressionFallback>,
}

impl PricingResult {
    /// Number of returned sample paths.
    pub fn sampled_paths(&self) -> usize {
        self.sample_paths.len()
    }
}

/// Builds a [`PricingResult`] from the engine outputs.
#[derive(Clone, Copy, Debug)]
pub struct ResultAggregator {
    max_sample_paths: usize,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self {
            max_sample_paths: MAX_SAMPLE_PATHS,
        }
    }
}

impl ResultAggregator {
    /// Creates an aggregator returning at most `max_sample_paths` paths,
    /// capped at [`MAX_SAMPLE_PATHS`].
    pub fn with_max_sample_paths(max_sample_paths: usize) -> Self {
        Self {
            max_sample_paths: max_sample_paths.min(MAX_SAMPLE_PATHS),
        }
    }

    /// The first simulated paths, in path-index order.
    pub fn sample_paths(&self, paths: &SimulatedPaths) -> Vec<Vec<f64>> {
        paths
            .paths()
            .take(self.max_sample_paths)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Summarises the dividends applied by `adjuster`.
    pub fn dividend_summary(
        &self,
        adjuster: &DividendAdjuster,
        forecast: &[ForecastDividend],
    ) -> DividendSummary {
        let dividends_in_period = adjuster.applied().to_vec();
        DividendSummary {
            num_dividends: dividends_in_period.len(),
            total_dividends: adjuster.total(),
            dividends_in_period,
            forecast_dividends: forecast.to_vec(),
        }
    }

    /// Packages all outputs of one run.
    pub fn aggregate(
        &self,
        request: &SimulationRequest,
        paths: &SimulatedPaths,
        adjuster: &DividendAdjuster,
        european: PriceEstimate,
        american: AmericanEstimate,
        black_scholes_price: Option<f64>,
    ) -> PricingResult {
        PricingResult {
            european,
            american: american.estimate,
            sample_paths: self.sample_paths(paths),
            dividend_summary: self.dividend_summary(adjuster, request.forecast_dividends()),
            volatility: request.heston().initial_volatility(),
            total_paths: paths.n_paths(),
            num_steps: paths.n_steps(),
            black_scholes_price,
            early_exercise_count: american.early_exercise_count,
            regression_fallbacks: american.fallbacks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::config::MonteCarloConfig;
    use crate::mc::paths::PathSimulator;
    use pricer_core::types::OptionType;
    use pricer_models::dividends::{DividendEvent, DividendSchedule};
    use pricer_models::models::HestonParams;

    fn simulate(n_paths: usize) -> (SimulationRequest, SimulatedPaths) {
        let request = SimulationRequest::builder()
            .option_type(OptionType::Call)
            .spot(100.0)
            .strike(100.0)
            .time_to_expiry(1.0)
            .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
            .config(MonteCarloConfig::builder().n_paths(n_paths).n_steps(4).build().unwrap())
            .build()
            .unwrap();
        let adjuster = DividendAdjuster::none(4);
        let paths = PathSimulator::new(&request, &adjuster).unwrap().simulate().unwrap();
        (request, paths)
    }

    #[test]
    fn test_sample_paths_truncated() {
        let (_, paths) = simulate(250);
        let sample = ResultAggregator::default().sample_paths(&paths);
        assert_eq!(sample.len(), MAX_SAMPLE_PATHS);
        assert_eq!(sample[0], paths.path(0));
        assert_eq!(sample[99], paths.path(99));
    }

    #[test]
    fn test_sample_paths_fewer_than_cap() {
        let (_, paths) = simulate(7);
        assert_eq!(ResultAggregator::default().sample_paths(&paths).len(), 7);
        assert_eq!(ResultAggregator::with_max_sample_paths(3).sample_paths(&paths).len(), 3);
        assert_eq!(
            ResultAggregator::with_max_sample_paths(1_000).max_sample_paths,
            MAX_SAMPLE_PATHS
        );
    }

    #[test]
    fn test_dividend_summary() {
        let schedule = DividendSchedule::new(vec![
            DividendEvent::new(0.25, 1.0),
            DividendEvent::new(0.75, 1.5),
            DividendEvent::new(2.0, 9.0),
        ])
        .unwrap();
        let adjuster = DividendAdjuster::new(&schedule, 1.0, 4);
        let summary = ResultAggregator::default().dividend_summary(&adjuster, &[]);
        assert_eq!(summary.num_dividends, 2);
        assert_eq!(summary.total_dividends, 2.5);
        assert_eq!(summary.dividends_in_period[1].step, 3);
        assert!(summary.forecast_dividends.is_empty());
    }

    #[test]
    fn test_aggregate_metadata() {
        let (request, paths) = simulate(10);
        let american = AmericanEstimate {
            estimate: PriceEstimate { price: 11.0, std_error: 0.2 },
            early_exercise_count: 0,
            fallbacks: Vec::new(),
        };
        let result = ResultAggregator::default().aggregate(
            &request,
            &paths,
            &DividendAdjuster::none(4),
            PriceEstimate { price: 10.0, std_error: 0.1 },
            american,
            Some(10.45),
        );
        assert_eq!(result.total_paths, 10);
        assert_eq!(result.num_steps, 4);
        assert_eq!(result.sampled_paths(), 10);
        assert!((result.volatility - 0.2).abs() < 1e-15);
        assert_eq!(result.american.price, 11.0);
        assert_eq!(result.dividend_summary, DividendSummary::default());
    }
}
