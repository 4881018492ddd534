//! Stochastic process models.
//!
//! Currently the Heston stochastic-volatility model, discretised with the
//! full-truncation Euler scheme for the variance and a log-Euler step for the
//! asset price.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::HestonParams;
//!
//! let params = HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap();
//! let (s_next, v_next) = params.step(100.0, 0.04, 0.05, 1.0 / 252.0, 0.0, 0.0);
//! assert!(s_next > 0.0 && v_next >= 0.0);
//! ```

pub mod heston;

pub use heston::{HestonError, HestonParams};
