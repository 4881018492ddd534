//! Heston Monte Carlo pricing.
//!
//! # Architecture
//!
//! ```text
//! HestonPricer
//! ├── SimulationRequest  (validated inputs + MonteCarloConfig)
//! ├── DividendAdjuster   (dividend drops on the time grid)
//! ├── PathSimulator      (correlated (S, v) paths, rayon-parallel)
//! ├── Deadline           (optional wall-clock limit, checked between paths/steps)
//! ├── EuropeanPricer     (discounted terminal payoff)
//! ├── LongstaffSchwartz  (backward induction, least-squares regression)
//! └── ResultAggregator   (sample paths, dividend summary)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::types::OptionType;
//! use pricer_models::dividends::DividendEvent;
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::mc::{HestonPricer, MonteCarloConfig, SimulationRequest};
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(5_000)
//!     .n_steps(50)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let request = SimulationRequest::builder()
//!     .option_type(OptionType::Call)
//!     .spot(100.0)
//!     .strike(105.0)
//!     .time_to_expiry(1.0)
//!     .risk_free_rate(0.03)
//!     .heston(HestonParams::new(1.5, 0.04, 0.5, -0.6, 0.04).unwrap())
//!     .dividends(vec![DividendEvent::new(0.5, 1.2)])
//!     .config(config)
//!     .build()
//!     .unwrap();
//!
//! let result = HestonPricer::new().price(&request).unwrap();
//! println!(
//!     "EU {:.4} ± {:.4}, US {:.4} ± {:.4}",
//!     result.european.price,
//!     result.european.confidence_95(),
//!     result.american.price,
//!     result.american.confidence_95(),
//! );
//! assert_eq!(result.dividend_summary.num_dividends, 1);
//! ```

pub mod american;
pub mod config;
pub mod deadline;
pub mod dividends;
pub mod error;
pub mod european;
pub mod paths;
pub mod pricer;
pub mod request;
pub mod result;

// Re-exports for convenient access
pub use american::{AmericanEstimate, LongstaffSchwartz, RegressionFallback, BASIS_DEGREE};
pub use config::{
    MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_SEED, MAX_GRID_POINTS, MAX_PATHS, MAX_STEPS,
    MIN_PATHS,
};
pub use deadline::Deadline;
pub use dividends::{AppliedDividend, DividendAdjuster, PRICE_FLOOR};
pub use error::ConfigError;
pub use european::{EuropeanPricer, PriceEstimate};
pub use paths::{PathSimulator, SimulatedPaths};
pub use pricer::{black_scholes_reference, HestonPricer};
pub use request::{SimulationRequest, SimulationRequestBuilder};
pub use result::{DividendSummary, PricingResult, ResultAggregator, MAX_SAMPLE_PATHS};
