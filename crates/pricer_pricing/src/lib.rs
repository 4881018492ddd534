//! # pricer_pricing: Heston Monte Carlo Engine
//!
//! ## Layer 3 Role
//!
//! pricer_pricing is the compute layer of the workspace:
//! - Per-path seeded random streams with correlated increments (`rng`)
//! - Heston path simulation with full-truncation variance (`mc::paths`)
//! - Discrete dividend drops on the simulation grid (`mc::dividends`)
//! - European and Longstaff-Schwartz American valuation (`mc::european`, `mc::american`)
//! - Request validation, orchestration and result packaging (`mc`)
//!
//! ## Layer Integration
//!
//! - Layer 1 (pricer_core): `OptionType`, `PricingError`, least-squares regression, sample statistics
//! - Layer 2 (pricer_models): `HestonParams`, dividend schedules, Black-Scholes reference
//!
//! The engine performs no I/O. Path simulation runs on the rayon global pool;
//! callers in an async context should move [`mc::HestonPricer::price`] onto a
//! blocking thread.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::OptionType;
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::mc::{HestonPricer, MonteCarloConfig, SimulationRequest};
//!
//! let request = SimulationRequest::builder()
//!     .option_type(OptionType::Call)
//!     .spot(100.0)
//!     .strike(100.0)
//!     .time_to_expiry(1.0)
//!     .risk_free_rate(0.05)
//!     .heston(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap())
//!     .config(MonteCarloConfig::builder().n_paths(1_000).n_steps(12).build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let result = HestonPricer::new().price(&request).unwrap();
//! assert!(result.european.price > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
// Allow unknown lints for clippy compatibility across versions
#![allow(unknown_lints)]

pub mod mc;
pub mod rng;
