//! Validated pricing request.

use pricer_core::types::{OptionType, PricingError};
use pricer_models::dividends::{DividendEvent, DividendSchedule, ForecastDividend};
use pricer_models::models::HestonParams;

use super::config::MonteCarloConfig;

/// Everything one pricing run needs, validated at construction.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionType;
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{MonteCarloConfig, SimulationRequest};
///
/// let request = SimulationRequest::builder()
///     .option_type(OptionType::Put)
///     .spot(100.0)
///     .strike(100.0)
///     .time_to_expiry(1.0)
///     .risk_free_rate(0.05)
///     .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
///     .config(MonteCarloConfig::builder().n_paths(1_000).n_steps(50).build().unwrap())
///     .build()
///     .unwrap();
///
/// assert!((request.dt() - 0.02).abs() < 1e-15);
///
/// // Non-positive strikes are rejected before any simulation.
/// let rejected = SimulationRequest::builder()
///     .option_type(OptionType::Put)
///     .spot(100.0)
///     .strike(0.0)
///     .time_to_expiry(1.0)
///     .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
///     .config(MonteCarloConfig::builder().n_paths(1_000).n_steps(50).build().unwrap())
///     .build();
/// assert!(rejected.is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationRequest {
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    heston: HestonParams,
    dividends: DividendSchedule,
    forecast_dividends: Vec<ForecastDividend>,
    config: MonteCarloConfig,
}

impl SimulationRequest {
    /// Creates a new request builder.
    pub fn builder() -> SimulationRequestBuilder {
        SimulationRequestBuilder::default()
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Initial asset price `S0`.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike `K`.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry `T` in years.
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Continuously compounded risk-free rate `r`.
    #[inline]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Heston model parameters.
    #[inline]
    pub fn heston(&self) -> &HestonParams {
        &self.heston
    }

    /// All dividends used by the simulation, explicit and forecast.
    #[inline]
    pub fn dividends(&self) -> &DividendSchedule {
        &self.dividends
    }

    /// The forecast payments that were merged into [`dividends`](Self::dividends).
    #[inline]
    pub fn forecast_dividends(&self) -> &[ForecastDividend] {
        &self.forecast_dividends
    }

    /// Simulation configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.config.n_paths()
    }

    /// Number of time steps.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.config.n_steps()
    }

    /// Time step `T / n_steps`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.time_to_expiry / self.config.n_steps() as f64
    }

    /// Seed driving the random streams.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.config.effective_seed()
    }
}

/// Builder for [`SimulationRequest`].
#[derive(Clone, Debug, Default)]
pub struct SimulationRequestBuilder {
    option_type: Option<OptionType>,
    spot: Option<f64>,
    strike: Option<f64>,
    time_to_expiry: Option<f64>,
    risk_free_rate: f64,
    heston: Option<HestonParams>,
    dividends: Vec<DividendEvent>,
    forecast_dividends: Vec<ForecastDividend>,
    config: Option<MonteCarloConfig>,
}

impl SimulationRequestBuilder {
    /// Sets the option type.
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    /// Sets the initial asset price.
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the strike.
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the time to expiry in years.
    pub fn time_to_expiry(mut self, time_to_expiry: f64) -> Self {
        self.time_to_expiry = Some(time_to_expiry);
        self
    }

    /// Sets the risk-free rate (default 0).
    pub fn risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Sets the Heston parameters.
    pub fn heston(mut self, heston: HestonParams) -> Self {
        self.heston = Some(heston);
        self
    }

    /// Sets the explicit dividend events.
    pub fn dividends(mut self, dividends: Vec<DividendEvent>) -> Self {
        self.dividends = dividends;
        self
    }

    /// Sets forecast dividends; they are merged with the explicit events.
    pub fn forecast_dividends(mut self, forecast: Vec<ForecastDividend>) -> Self {
        self.forecast_dividends = forecast;
        self
    }

    /// Sets the simulation configuration.
    pub fn config(mut self, config: MonteCarloConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validates and builds the request.
    ///
    /// # Errors
    /// [`PricingError::InvalidParameter`] for missing or out-of-range fields.
    /// Names match the JSON keys of the pricing endpoint.
    pub fn build(self) -> Result<SimulationRequest, PricingError> {
        let option_type = self
            .option_type
            .ok_or_else(|| PricingError::invalid("callOrPut", "must be specified"))?;
        let spot = positive("spot", self.spot)?;
        let strike = positive("K", self.strike)?;
        let time_to_expiry = positive("T", self.time_to_expiry)?;
        if !self.risk_free_rate.is_finite() {
            return Err(PricingError::invalid(
                "riskFreeRate",
                format!("must be finite, got {}", self.risk_free_rate),
            ));
        }
        let heston = self
            .heston
            .ok_or_else(|| PricingError::invalid("heston", "must be specified"))?;
        heston.validate()?;
        let config = self
            .config
            .ok_or_else(|| PricingError::invalid("numSims", "must be specified"))?;
        config.validate()?;

        let mut events = self.dividends;
        events.extend(self.forecast_dividends.iter().map(ForecastDividend::to_event));
        let dividends = DividendSchedule::new(events)?;

        Ok(SimulationRequest {
            option_type,
            spot,
            strike,
            time_to_expiry,
            risk_free_rate: self.risk_free_rate,
            heston,
            dividends,
            forecast_dividends: self.forecast_dividends,
            config,
        })
    }
}

fn positive(name: &'static str, value: Option<f64>) -> Result<f64, PricingError> {
    match value {
        None => Err(PricingError::invalid(name, "must be specified")),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(PricingError::invalid(
            name,
            format!("must be positive, got {}", v),
        )),
    }
}
