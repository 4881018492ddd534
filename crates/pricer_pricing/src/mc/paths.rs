//! Heston path simulation.
//!
//! Each path evolves `(S_t, v_t)` over `n_steps` steps of `dt = T / n_steps`
//! with the full-truncation variance update and the log-Euler price update
//! of [`HestonParams::step`], floors the price at [`PRICE_FLOOR`], then
//! applies any dividend drop scheduled at the new step.
//!
//! # Memory Layout
//!
//! Prices are stored in row-major order:
//! `prices[path_idx * (n_steps + 1) + step_idx]`, where `step_idx = 0` holds
//! the initial state. The variance only feeds the next step, so it is kept
//! as a per-path running value; the full variance grid is stored only when
//! requested with [`PathSimulator::record_variances`].
//!
//! # Parallelism
//!
//! Paths are independent. With `parallel` enabled the buffers are split into
//! per-path chunks on the rayon pool; each worker owns its chunk and reads
//! only shared immutable parameters. Path identity is the chunk index, so the
//! output does not depend on scheduling.

use pricer_core::types::PricingError;
use pricer_models::models::HestonParams;
use rayon::prelude::*;

use super::deadline::{self, Deadline};
use super::dividends::{DividendAdjuster, PRICE_FLOOR};
use super::request::SimulationRequest;
use crate::rng::RandomStreamProvider;

/// Paths simulated between two deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Simulated price paths, with the variance paths when recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedPaths {
    n_paths: usize,
    n_steps: usize,
    prices: Vec<f64>,
    variances: Option<Vec<f64>>,
}

impl SimulatedPaths {
    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps (each path has `n_steps + 1` points).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    #[inline]
    fn width(&self) -> usize {
        self.n_steps + 1
    }

    /// Price of path `path_idx` at step `step`.
    #[inline]
    pub fn price(&self, path_idx: usize, step: usize) -> f64 {
        self.prices[path_idx * self.width() + step]
    }

    /// Full price path `path_idx`.
    #[inline]
    pub fn path(&self, path_idx: usize) -> &[f64] {
        let w = self.width();
        &self.prices[path_idx * w..(path_idx + 1) * w]
    }

    /// Full variance path `path_idx`, if variances were recorded.
    #[inline]
    pub fn variance_path(&self, path_idx: usize) -> Option<&[f64]> {
        let w = self.width();
        self.variances
            .as_deref()
            .map(|v| &v[path_idx * w..(path_idx + 1) * w])
    }

    /// Iterator over price paths in index order.
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.prices.chunks_exact(self.width())
    }

    /// All prices, row-major.
    #[inline]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// All variances, row-major, if recorded.
    #[inline]
    pub fn variances(&self) -> Option<&[f64]> {
        self.variances.as_deref()
    }

    /// Prices at step `n_steps` for every path.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.prices_at(self.n_steps)
    }

    /// Prices at `step` for every path.
    pub fn prices_at(&self, step: usize) -> Vec<f64> {
        self.paths().map(|path| path[step]).collect()
    }
}

/// Simulates Heston paths for one request.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionType;
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{DividendAdjuster, MonteCarloConfig, PathSimulator, SimulationRequest};
///
/// let request = SimulationRequest::builder()
///     .option_type(OptionType::Call)
///     .spot(100.0)
///     .strike(100.0)
///     .time_to_expiry(1.0)
///     .risk_free_rate(0.05)
///     .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
///     .config(MonteCarloConfig::builder().n_paths(64).n_steps(12).seed(1).build().unwrap())
///     .build()
///     .unwrap();
///
/// let adjuster = DividendAdjuster::none(request.n_steps());
/// let paths = PathSimulator::new(&request, &adjuster).unwrap().simulate().unwrap();
///
/// assert_eq!(paths.n_paths(), 64);
/// assert_eq!(paths.path(0).len(), 13);
/// assert_eq!(paths.price(0, 0), 100.0);
/// assert!(paths.variances().is_none());
/// ```
pub struct PathSimulator<'a> {
    heston: &'a HestonParams,
    adjuster: &'a DividendAdjuster,
    streams: RandomStreamProvider,
    spot: f64,
    rate: f64,
    dt: f64,
    n_paths: usize,
    n_steps: usize,
    parallel: bool,
    record_variances: bool,
    deadline: Option<Deadline>,
}

impl<'a> PathSimulator<'a> {
    /// Creates a simulator for `request` with dividend drops from `adjuster`.
    ///
    /// # Errors
    /// [`PricingError::InvalidParameter`] if the correlation is out of range.
    pub fn new(
        request: &'a SimulationRequest,
        adjuster: &'a DividendAdjuster,
    ) -> Result<Self, PricingError> {
        let heston = request.heston();
        let streams = RandomStreamProvider::new(request.seed(), heston.rho())?;
        Ok(Self {
            heston,
            adjuster,
            streams,
            spot: request.spot(),
            rate: request.risk_free_rate(),
            dt: request.dt(),
            n_paths: request.n_paths(),
            n_steps: request.n_steps(),
            parallel: request.config().parallel(),
            record_variances: false,
            deadline: None,
        })
    }

    /// Also stores the full variance grid (default: off).
    pub fn record_variances(mut self, record: bool) -> Self {
        self.record_variances = record;
        self
    }

    /// Stops the simulation with [`PricingError::ComputeTimeout`] once
    /// `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Option<Deadline>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Runs the simulation.
    ///
    /// # Errors
    /// [`PricingError::ComputeTimeout`] if the deadline passes mid-run; the
    /// partial buffers are dropped.
    pub fn simulate(&self) -> Result<SimulatedPaths, PricingError> {
        let width = self.n_steps + 1;
        let mut prices = vec![0.0; self.n_paths * width];
        let mut variances = self
            .record_variances
            .then(|| vec![0.0; self.n_paths * width]);

        let filled: Result<(), PricingError> = match (variances.as_mut(), self.parallel) {
            (Some(vars), true) => prices
                .par_chunks_mut(width)
                .zip(vars.par_chunks_mut(width))
                .enumerate()
                .try_for_each(|(path_idx, (s, v))| self.fill_path(path_idx, s, Some(v))),
            (Some(vars), false) => prices
                .chunks_mut(width)
                .zip(vars.chunks_mut(width))
                .enumerate()
                .try_for_each(|(path_idx, (s, v))| self.fill_path(path_idx, s, Some(v))),
            (None, true) => prices
                .par_chunks_mut(width)
                .enumerate()
                .try_for_each(|(path_idx, s)| self.fill_path(path_idx, s, None)),
            (None, false) => prices
                .chunks_mut(width)
                .enumerate()
                .try_for_each(|(path_idx, s)| self.fill_path(path_idx, s, None)),
        };
        filled?;

        Ok(SimulatedPaths {
            n_paths: self.n_paths,
            n_steps: self.n_steps,
            prices,
            variances,
        })
    }

    fn fill_path(
        &self,
        path_idx: usize,
        prices: &mut [f64],
        mut variances: Option<&mut [f64]>,
    ) -> Result<(), PricingError> {
        if path_idx % DEADLINE_CHECK_INTERVAL == 0 {
            deadline::check(self.deadline.as_ref())?;
        }

        let mut stream = self.streams.stream(path_idx);
        let mut variance = self.heston.v0();
        prices[0] = self.spot;
        if let Some(v) = variances.as_deref_mut() {
            v[0] = variance;
        }

        for t in 0..self.n_steps {
            let (dw_s, dw_v) = stream.next_increments();
            let (s_next, v_next) =
                self.heston
                    .step(prices[t], variance, self.rate, self.dt, dw_s, dw_v);
            prices[t + 1] = self.adjuster.adjust(t + 1, s_next.max(PRICE_FLOOR));
            variance = v_next;
            if let Some(v) = variances.as_deref_mut() {
                v[t + 1] = variance;
            }
        }
        Ok(())
    }
}
