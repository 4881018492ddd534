//! # Random Number Generation Infrastructure
//!
//! Seeded, per-path random streams for Monte Carlo simulation.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: the same `(seed, path_index)` always yields the same
//!   sequence, regardless of thread scheduling
//! - **Independence**: each path owns a generator keyed by the full 256-bit
//!   ChaCha seed `(seed, path_index, tag)`, so no two paths share a sub-stream
//! - **No shared state**: streams are created and consumed by value inside
//!   the worker that simulates the path
//!
//! ## Module Structure
//!
//! - [`PricerRng`]: Seeded wrapper around `rand::rngs::StdRng`
//! - [`RandomStreamProvider`] / [`CorrelatedNormalStream`]: correlated pairs
//!   `(dW_S, dW_v)` per time step
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::RandomStreamProvider;
//!
//! let provider = RandomStreamProvider::new(42, -0.7).unwrap();
//!
//! let mut a = provider.stream(0);
//! let mut b = provider.stream(0);
//! assert_eq!(a.next_increments(), b.next_increments());
//!
//! // Correlation outside [-1, 1] fails before any draw.
//! assert!(RandomStreamProvider::new(42, 1.5).is_err());
//! ```

mod correlated;
mod prng;

// Public re-exports
pub use correlated::{CorrelatedNormalStream, RandomStreamProvider};
pub use prng::PricerRng;
