//! # pricer_core: Shared Foundation for the Heston Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Option type and payoff primitives (`types::option`)
//! - The engine-wide error taxonomy: `PricingError` (`types::error`)
//! - Least-squares polynomial regression for continuation values (`math::regression`)
//! - Sample statistics for Monte Carlo estimators (`math::statistics`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Structured error types
//! - nalgebra: Cholesky factorisation for least squares
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::statistics::SampleStatistics;
//! use pricer_core::types::OptionType;
//!
//! let payoffs: Vec<f64> = [90.0, 100.0, 110.0, 120.0]
//!     .iter()
//!     .map(|&spot| OptionType::Call.intrinsic(spot, 100.0))
//!     .collect();
//!
//! let stats = SampleStatistics::from_samples(&payoffs).unwrap();
//! assert!((stats.mean - 7.5).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `OptionType`

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
