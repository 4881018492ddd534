//! REST API server for the Heston Monte Carlo option pricer
//!
//! This crate exposes the pricing engine over HTTP. It only translates JSON
//! into engine requests; all validation and numerics live in the pricer crates.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

// Re-export pricer dependencies for integration
pub use pricer_core;
pub use pricer_models;
pub use pricer_pricing;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
