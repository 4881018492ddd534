//! Analytical reference prices for European options.
//!
//! The Monte Carlo engine reports a Black-Scholes price at the Heston
//! long-run volatility next to its estimates. With vanishing vol-of-vol and
//! `v0 = theta_var` the Heston model collapses to Black-Scholes, which makes
//! this the natural convergence check.

pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use black_scholes::BlackScholes;
pub use distributions::norm_cdf;
pub use error::AnalyticalError;
