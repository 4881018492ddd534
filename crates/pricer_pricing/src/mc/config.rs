//! Monte Carlo simulation configuration.

use super::error::ConfigError;

/// Minimum number of simulation paths (a standard error needs two samples).
pub const MIN_PATHS: usize = 2;

/// Maximum number of simulation paths accepted per request.
pub const MAX_PATHS: usize = 100_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Maximum number of stored price points, `n_paths * (n_steps + 1)`.
///
/// The simulated price grid is kept in memory for the backward induction;
/// this bounds it to 400 MB of `f64`.
pub const MAX_GRID_POINTS: usize = 50_000_000;

/// Seed used when a request does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .n_steps(252)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.n_steps(), 252);
/// assert!(config.parallel());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    /// Number of simulation paths.
    n_paths: usize,
    /// Number of time steps per path.
    n_steps: usize,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Whether paths are simulated on the rayon pool.
    parallel: bool,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the seed, or [`DEFAULT_SEED`] when none was set.
    #[inline]
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Returns `true` if path simulation runs in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Number of stored price points, `n_paths * (n_steps + 1)`.
    #[inline]
    pub fn grid_points(&self) -> usize {
        self.n_paths.saturating_mul(self.n_steps.saturating_add(1))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is outside `[MIN_PATHS, MAX_PATHS]`
    /// - `n_steps` is 0 or greater than `MAX_STEPS`
    /// - the price grid exceeds `MAX_GRID_POINTS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths < MIN_PATHS {
            return Err(ConfigError::TooFewPaths(self.n_paths));
        }
        if self.n_paths > MAX_PATHS {
            return Err(ConfigError::TooManyPaths(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if self.grid_points() > MAX_GRID_POINTS {
            return Err(ConfigError::GridTooLarge {
                n_paths: self.n_paths,
                n_steps: self.n_steps,
            });
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Validation happens in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    seed: Option<u64>,
    parallel: bool,
}

impl Default for MonteCarloConfigBuilder {
    fn default() -> Self {
        Self {
            n_paths: None,
            n_steps: None,
            seed: None,
            parallel: true,
        }
    }
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed; `None` leaves the default in place.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel path simulation (default: enabled).
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` not set or invalid
    /// - `n_steps` not set or invalid
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::MissingParameter("numSims"))?;
        let n_steps = self.n_steps.ok_or(ConfigError::MissingParameter("numSteps"))?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps,
            seed: self.seed,
            parallel: self.parallel,
        };

        config.validate()?;
        Ok(config)
    }
}
