//! Option pricing endpoints
//!
//! `POST /price_option` (alias `POST /api/v1/price/heston`) prices a European
//! and an American option under the Heston model by Monte Carlo simulation.
//! The engine runs on a blocking thread under the configured compute timeout.

use std::str::FromStr;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use chrono::NaiveDate;
use pricer_core::types::{OptionType, PricingError};
use pricer_models::dividends::{forecast_dividends, DividendEvent, HistoricalDividend};
use pricer_models::models::HestonParams;
use pricer_pricing::mc::{MonteCarloConfig, PricingResult, SimulationRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument, Span};

use super::AppState;
use crate::config::ServerConfig;
use crate::error::ApiError;

/// Trading days per year used for the default step count
pub const STEPS_PER_YEAR: f64 = 252.0;

/// Heston parameters as sent by the client
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HestonInput {
    /// Mean-reversion speed
    pub kappa: f64,
    /// Long-run variance
    pub theta_var: f64,
    /// Volatility of variance
    pub sigma_var: f64,
    /// Price/variance correlation
    pub rho: f64,
    /// Initial variance
    pub v0: f64,
}

/// Pricing request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOptionRequest {
    /// "call" or "put", case-insensitive
    pub call_or_put: String,
    /// Underlying symbol, echoed upper-cased
    pub ticker: String,
    /// Strike
    #[serde(rename = "K")]
    pub strike: f64,
    /// Time to expiry in years
    #[serde(rename = "T")]
    pub time_to_expiry: f64,
    /// Number of simulated paths
    pub num_sims: usize,
    /// Spot price
    pub spot: f64,
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Model parameters
    pub heston: HestonInput,
    /// Time steps; defaults to `max(1, round(T * 252))`
    #[serde(default)]
    pub num_steps: Option<usize>,
    /// Random seed; defaults to the server's seed
    #[serde(default)]
    pub seed: Option<u64>,
    /// Explicit dividends in year fractions
    #[serde(default)]
    pub dividends: Vec<DividendEvent>,
    /// Past payments used to forecast dividends
    #[serde(default)]
    pub dividend_history: Vec<HistoricalDividend>,
    /// Valuation date for the forecast
    #[serde(default)]
    pub valuation_date: Option<NaiveDate>,
}

/// A dividend placed on the simulation grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendInPeriod {
    /// Ex-dividend time in years
    pub time: f64,
    /// Cash amount
    pub amount: f64,
    /// Grid step of the price drop
    pub step: usize,
}

/// A forecast payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDividendInfo {
    /// Projected payment date
    pub date: NaiveDate,
    /// Projected amount
    pub amount: f64,
}

/// Dividends over the option's life
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionPeriodInfo {
    /// Dividends applied to the simulated paths
    pub dividends_in_period: Vec<DividendInPeriod>,
    /// Payments forecast from history
    pub forecast_dividends: Vec<ForecastDividendInfo>,
    /// Sum of applied amounts
    pub total_dividends: f64,
    /// Number of applied dividends
    pub num_dividends: usize,
}

/// `dividends` field of the response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendsInfo {
    /// Dividends over the option's life
    pub option_period_info: OptionPeriodInfo,
}

/// Pricing response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOptionResponse {
    /// American (Longstaff-Schwartz) price
    pub us_option_price: f64,
    /// European price
    pub eu_option_price: f64,
    /// Standard error of the American price
    pub us_price_std: f64,
    /// Standard error of the European price
    pub eu_price_std: f64,
    /// Sample price paths, `paths[i][j]` is path `i` at step `j`
    pub paths: Vec<Vec<f64>>,
    /// Initial volatility `sqrt(v0)`
    pub vol: f64,
    /// Dividend summary
    pub dividends: DividendsInfo,
    /// Upper-cased ticker
    pub ticker: String,
    /// Strike
    pub strike: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// "call" or "put"
    pub option_type: String,
    /// Number of simulated paths
    pub total_paths: usize,
    /// Number of returned paths
    pub sampled_paths: usize,
    /// Black-Scholes reference price, absent when undefined
    pub bs_option_price: Option<f64>,
}

impl PriceOptionResponse {
    fn from_result(
        result: PricingResult,
        ticker: String,
        option_type: OptionType,
        request: &SimulationRequest,
    ) -> Self {
        let summary = result.dividend_summary;
        let dividends = DividendsInfo {
            option_period_info: OptionPeriodInfo {
                dividends_in_period: summary
                    .dividends_in_period
                    .iter()
                    .map(|d| DividendInPeriod {
                        time: d.time,
                        amount: d.amount,
                        step: d.step,
                    })
                    .collect(),
                forecast_dividends: summary
                    .forecast_dividends
                    .iter()
                    .map(|d| ForecastDividendInfo {
                        date: d.date,
                        amount: d.amount,
                    })
                    .collect(),
                total_dividends: summary.total_dividends,
                num_dividends: summary.num_dividends,
            },
        };

        Self {
            us_option_price: result.american.price,
            eu_option_price: result.european.price,
            us_price_std: result.american.std_error,
            eu_price_std: result.european.std_error,
            sampled_paths: result.sample_paths.len(),
            paths: result.sample_paths,
            vol: result.volatility,
            dividends,
            ticker,
            strike: request.strike(),
            time_to_expiry: request.time_to_expiry(),
            option_type: option_type.to_string(),
            total_paths: result.total_paths,
            bs_option_price: result.black_scholes_price,
        }
    }
}

/// Default step count for an expiry of `t` years
pub fn default_num_steps(t: f64) -> usize {
    ((t * STEPS_PER_YEAR).round() as usize).max(1)
}

impl PriceOptionRequest {
    /// Validates the body and builds the engine request.
    ///
    /// Checks run in the order `callOrPut`, `K`, `T`, `numSims`, then the
    /// engine's own validation.
    pub fn to_simulation_request(
        &self,
        config: &ServerConfig,
    ) -> Result<(OptionType, SimulationRequest), PricingError> {
        let option_type = OptionType::from_str(&self.call_or_put)?;
        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(PricingError::invalid(
                "K",
                format!("must be positive, got {}", self.strike),
            ));
        }
        if !(self.time_to_expiry.is_finite() && self.time_to_expiry > 0.0) {
            return Err(PricingError::invalid(
                "T",
                format!("must be positive, got {}", self.time_to_expiry),
            ));
        }
        if self.num_sims > config.max_sims {
            return Err(PricingError::invalid(
                "numSims",
                format!("must be at most {}, got {}", config.max_sims, self.num_sims),
            ));
        }

        let heston = HestonParams::new(
            self.heston.kappa,
            self.heston.theta_var,
            self.heston.sigma_var,
            self.heston.rho,
            self.heston.v0,
        )?;

        let mc_config = MonteCarloConfig::builder()
            .n_paths(self.num_sims)
            .n_steps(
                self.num_steps
                    .unwrap_or_else(|| default_num_steps(self.time_to_expiry)),
            )
            .maybe_seed(self.seed.or(config.default_seed))
            .build()?;

        let forecast = if self.dividend_history.is_empty() {
            Vec::new()
        } else {
            let valuation_date = self.valuation_date.ok_or_else(|| {
                PricingError::invalid("valuationDate", "required with dividendHistory")
            })?;
            forecast_dividends(&self.dividend_history, valuation_date, self.time_to_expiry)?
        };

        let request = SimulationRequest::builder()
            .option_type(option_type)
            .spot(self.spot)
            .strike(self.strike)
            .time_to_expiry(self.time_to_expiry)
            .risk_free_rate(self.risk_free_rate)
            .heston(heston)
            .dividends(self.dividends.clone())
            .forecast_dividends(forecast)
            .config(mc_config)
            .build()?;

        Ok((option_type, request))
    }
}

/// Build the pricing routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/price_option", post(price_option))
        .route("/api/v1/price/heston", post(price_option))
}

/// POST /price_option - Heston Monte Carlo pricing
async fn price_option(
    State(state): State<AppState>,
    payload: Result<Json<PriceOptionRequest>, JsonRejection>,
) -> Result<Json<PriceOptionResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    let ticker = body.ticker.trim().to_uppercase();

    let span = info_span!("price_option", ticker = %ticker, num_sims = body.num_sims);
    async move {
        let (option_type, request) = body.to_simulation_request(&state.config)?;
        info!(
            option_type = %option_type,
            n_steps = request.n_steps(),
            dividends = request.dividends().len(),
            "pricing request accepted"
        );

        let started = Instant::now();
        let limit = state.config.compute_timeout();
        let pricer = state.pricer;
        let worker_span = Span::current();
        let task = tokio::task::spawn_blocking(move || {
            worker_span.in_scope(|| pricer.price(&request).map(|result| (request, result)))
        });

        let (request, result) = match tokio::time::timeout(limit, task).await {
            Err(_) => {
                return Err(PricingError::ComputeTimeout {
                    limit_ms: limit.as_millis() as u64,
                }
                .into())
            }
            Ok(Err(join_error)) => return Err(ApiError::Internal(join_error.to_string())),
            Ok(Ok(priced)) => priced?,
        };

        info!(
            european = result.european.price,
            american = result.american.price,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pricing request completed"
        );

        Ok::<_, ApiError>(Json(PriceOptionResponse::from_result(
            result,
            ticker,
            option_type,
            &request,
        )))
    }
    .instrument(span)
    .await
}
