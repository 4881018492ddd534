//! American exercise via Longstaff-Schwartz least-squares Monte Carlo.
//!
//! # Algorithm
//!
//! 1. Every path starts with the exercise value at expiry as its cash flow,
//!    exercised at step `n_steps`.
//! 2. For `t = n_steps - 1` down to `1`, the cash flows of in-the-money paths,
//!    discounted from their exercise step back to `t`, are regressed on
//!    `{1, x, x²}` with `x = S_t / K`. The fitted value is the continuation
//!    value.
//! 3. Where the exercise value beats the continuation value the path's cash
//!    flow becomes the exercise value and its exercise step becomes `t`.
//! 4. Each cash flow is discounted from its own exercise step to 0 and the
//!    results are averaged.
//!
//! # Regression fallback
//!
//! If a step has fewer in-the-money paths than basis functions, or the
//! least-squares solve fails, the continuation value at that step is taken
//! as zero, which exercises every in-the-money path there. Each occurrence is
//! logged at `warn` level and reported as a [`RegressionFallback`].

use pricer_core::math::regression::fit_polynomial;
use pricer_core::types::{OptionType, PricingError};
use tracing::warn;

use super::deadline::{self, Deadline};
use super::european::PriceEstimate;
use super::paths::SimulatedPaths;
use super::request::SimulationRequest;

/// Degree of the polynomial basis `{1, x, x²}`.
pub const BASIS_DEGREE: usize = 2;

/// A step at which the continuation value was set to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct RegressionFallback {
    /// Time step index.
    pub step: usize,
    /// Number of in-the-money paths at the step.
    pub itm_paths: usize,
    /// Why the regression was skipped.
    pub reason: String,
}

/// American price estimate with exercise diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct AmericanEstimate {
    /// Price and standard error.
    pub estimate: PriceEstimate,
    /// Paths exercised before expiry.
    pub early_exercise_count: usize,
    /// Steps that used the zero-continuation policy.
    pub fallbacks: Vec<RegressionFallback>,
}

/// Buffers reused across backward-induction steps.
#[derive(Debug, Default)]
struct LsmWorkspace {
    itm: Vec<usize>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    exercise: Vec<f64>,
    continuation: Vec<f64>,
}

impl LsmWorkspace {
    fn with_capacity(n: usize) -> Self {
        Self {
            itm: Vec::with_capacity(n),
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            exercise: Vec::with_capacity(n),
            continuation: Vec::with_capacity(n),
        }
    }

    fn clear(&mut self) {
        self.itm.clear();
        self.xs.clear();
        self.ys.clear();
        self.exercise.clear();
        self.continuation.clear();
    }
}

/// Longstaff-Schwartz pricer.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionType;
/// use pricer_pricing::mc::LongstaffSchwartz;
///
/// let lsm = LongstaffSchwartz::new(OptionType::Put, 100.0, 0.05, 1.0);
/// assert_eq!(lsm.basis_degree(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongstaffSchwartz {
    option_type: OptionType,
    strike: f64,
    rate: f64,
    time_to_expiry: f64,
    basis_degree: usize,
    deadline: Option<Deadline>,
}

impl LongstaffSchwartz {
    /// Creates a pricer with the quadratic basis.
    pub fn new(option_type: OptionType, strike: f64, rate: f64, time_to_expiry: f64) -> Self {
        Self {
            option_type,
            strike,
            rate,
            time_to_expiry,
            basis_degree: BASIS_DEGREE,
            deadline: None,
        }
    }

    /// Stops the backward induction with [`PricingError::ComputeTimeout`]
    /// once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Option<Deadline>) -> Self {
        self.deadline = deadline;
        self
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

    /// Polynomial degree of the regression basis.
    pub fn basis_degree(&self) -> usize {
        self.basis_degree
    }

    /// Runs backward induction over `paths`.
    ///
    /// # Errors
    /// [`PricingError::InsufficientSamples`] if there are fewer than two
    /// paths, [`PricingError::ComputeTimeout`] if the deadline passes.
    /// Regression failures are not errors; see the module docs.
    pub fn price(&self, paths: &SimulatedPaths) -> Result<AmericanEstimate, PricingError> {
        let n_paths = paths.n_paths();
        let n_steps = paths.n_steps();
        let dt = self.time_to_expiry / n_steps as f64;
        let step_discount = |steps: usize| (-self.rate * dt * steps as f64).exp();

        let mut cash_flow: Vec<f64> = (0..n_paths)
            .map(|i| self.option_type.intrinsic(paths.price(i, n_steps), self.strike))
            .collect();
        let mut exercise_step = vec![n_steps; n_paths];

        let mut ws = LsmWorkspace::with_capacity(n_paths);
        let mut fallbacks = Vec::new();

        for t in (1..n_steps).rev() {
            deadline::check(self.deadline.as_ref())?;
            ws.clear();
            for i in 0..n_paths {
                let spot = paths.price(i, t);
                let exercise = self.option_type.intrinsic(spot, self.strike);
                if exercise > 0.0 {
                    ws.itm.push(i);
                    ws.xs.push(spot);
                    ws.ys.push(cash_flow[i] * step_discount(exercise_step[i] - t));
                    ws.exercise.push(exercise);
                }
            }
            if ws.itm.is_empty() {
                continue;
            }

            match fit_polynomial(&ws.xs, &ws.ys, self.basis_degree, self.strike) {
                Ok(fit) => ws
                    .continuation
                    .extend(ws.xs.iter().map(|&x| fit.evaluate(x))),
                Err(err) => {
                    warn!(
                        step = t,
                        itm_paths = ws.itm.len(),
                        error = %err,
                        "regression skipped, continuation value set to zero"
                    );
                    fallbacks.push(RegressionFallback {
                        step: t,
                        itm_paths: ws.itm.len(),
                        reason: err.to_string(),
                    });
                    ws.continuation.resize(ws.itm.len(), 0.0);
                }
            }

            for (k, &i) in ws.itm.iter().enumerate() {
                if ws.exercise[k] > ws.continuation[k] {
                    cash_flow[i] = ws.exercise[k];
                    exercise_step[i] = t;
                }
            }
        }

        let discounted: Vec<f64> = cash_flow
            .iter()
            .zip(&exercise_step)
            .map(|(&cf, &step)| cf * step_discount(step))
            .collect();
        let estimate = PriceEstimate::from_samples(&discounted)?;
        let early_exercise_count = exercise_step.iter().filter(|&&s| s < n_steps).count();

        Ok(AmericanEstimate {
            estimate,
            early_exercise_count,
            fallbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::config::MonteCarloConfig;
    use crate::mc::dividends::DividendAdjuster;
    use crate::mc::european::EuropeanPricer;
    use crate::mc::paths::PathSimulator;
    use approx::assert_relative_eq;
    use pricer_models::models::HestonParams;

    fn simulate(option_type: OptionType, strike: f64, n_paths: usize, n_steps: usize) -> (SimulationRequest, SimulatedPaths) {
        let request = SimulationRequest::builder()
            .option_type(option_type)
            .spot(100.0)
            .strike(strike)
            .time_to_expiry(1.0)
            .risk_free_rate(0.05)
            .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
            .config(
                MonteCarloConfig::builder()
                    .n_paths(n_paths)
                    .n_steps(n_steps)
                    .seed(2024)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let adjuster = DividendAdjuster::none(n_steps);
        let paths = PathSimulator::new(&request, &adjuster).unwrap().simulate().unwrap();
        (request, paths)
    }

    #[test]
    fn test_single_step_equals_european() {
        // With one step there is no early exercise date.
        let (request, paths) = simulate(OptionType::Put, 100.0, 2_000, 1);
        let american = LongstaffSchwartz::for_request(&request).price(&paths).unwrap();
        let european = EuropeanPricer::for_request(&request)
            .price(&paths.terminal_prices())
            .unwrap();
        assert_relative_eq!(american.estimate.price, european.price, epsilon = 1e-12);
        assert_eq!(american.early_exercise_count, 0);
        assert!(american.fallbacks.is_empty());
    }

    #[test]
    fn test_deep_itm_put_exercises_early() {
        let (request, paths) = simulate(OptionType::Put, 150.0, 4_000, 50);
        let american = LongstaffSchwartz::for_request(&request).price(&paths).unwrap();
        let european = EuropeanPricer::for_request(&request)
            .price(&paths.terminal_prices())
            .unwrap();
        assert!(american.early_exercise_count > 0);
        assert!(american.estimate.price > european.price);
    }

    #[test]
    fn test_call_without_dividends_matches_european() {
        // Early exercise of a call on a non-dividend stock is never optimal,
        // so the two estimates should be close.
        let (request, paths) = simulate(OptionType::Call, 100.0, 4_000, 25);
        let american = LongstaffSchwartz::for_request(&request).price(&paths).unwrap();
        let european = EuropeanPricer::for_request(&request)
            .price(&paths.terminal_prices())
            .unwrap();
        let tolerance = 3.0 * european.std_error;
        assert!(
            (american.estimate.price - european.price).abs() < tolerance,
            "american = {}, european = {}",
            american.estimate.price,
            european.price
        );
    }

    #[test]
    fn test_sparse_itm_step_falls_back() {
        // Far out-of-the-money call: most steps have zero or very few ITM paths.
        let (request, paths) = simulate(OptionType::Call, 160.0, 200, 20);
        let american = LongstaffSchwartz::for_request(&request).price(&paths).unwrap();
        for fallback in &american.fallbacks {
            assert!((1..20).contains(&fallback.step));
            assert!(!fallback.reason.is_empty());
        }
        assert!(american.estimate.price >= 0.0);
    }

    #[test]
    fn test_fallback_forces_exercise() {
        // Two paths, one step before expiry in the money: too few for a
        // quadratic fit, so both ITM paths exercise at step 1.
        let request = SimulationRequest::builder()
            .option_type(OptionType::Put)
            .spot(90.0)
            .strike(100.0)
            .time_to_expiry(1.0)
            .risk_free_rate(0.0)
            .heston(HestonParams::new(0.0, 0.0, 0.0, 0.0, 0.0).unwrap())
            .config(MonteCarloConfig::builder().n_paths(2).n_steps(2).build().unwrap())
            .build()
            .unwrap();
        let adjuster = DividendAdjuster::none(2);
        let paths = PathSimulator::new(&request, &adjuster).unwrap().simulate().unwrap();
        let american = LongstaffSchwartz::for_request(&request).price(&paths).unwrap();

        assert_eq!(american.fallbacks.len(), 1);
        assert_eq!(american.fallbacks[0].step, 1);
        assert_eq!(american.fallbacks[0].itm_paths, 2);
        assert_eq!(american.early_exercise_count, 2);
        assert_relative_eq!(american.estimate.price, 10.0, epsilon = 1e-12);
        assert_eq!(american.estimate.std_error, 0.0);
    }

    #[test]
    fn test_expired_deadline_stops_backward_induction() {
        let (request, paths) = simulate(OptionType::Put, 100.0, 500, 10);
        let err = LongstaffSchwartz::for_request(&request)
            .with_deadline(Some(Deadline::after(std::time::Duration::ZERO)))
            .price(&paths)
            .unwrap_err();
        assert_eq!(err, PricingError::ComputeTimeout { limit_ms: 0 });
    }
}
