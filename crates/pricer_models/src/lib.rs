//! # Pricer Models (L2: Business Logic)
//!
//! Model parameters, reference formulas and dividend schedules consumed by the
//! Monte Carlo engine.
//!
//! This crate provides:
//! - Heston stochastic-volatility parameters and the discretised step
//!   (`models::heston`)
//! - Black-Scholes closed-form prices used as a convergence reference
//!   (`analytical`)
//! - Discrete dividend events, validated schedules and the historical
//!   dividend forecaster (`dividends`)
//!
//! ## Design Principles
//!
//! - **Validate on construction**: every parameter set is checked once, at
//!   the boundary, and is immutable afterwards
//! - **Local error enums** convert into `pricer_core::types::PricingError`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod dividends;
pub mod models;
