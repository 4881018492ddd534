//! Correlated Brownian increments for two-factor simulation.

use pricer_core::types::PricingError;

use super::prng::PricerRng;

/// Hands out one [`CorrelatedNormalStream`] per path index.
///
/// Holds only the request seed and the Cholesky factors of the 2x2
/// correlation matrix, so it is `Copy` and shared read-only across workers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomStreamProvider {
    seed: u64,
    rho: f64,
    rho_complement: f64,
}

impl RandomStreamProvider {
    /// Creates a provider for correlation `rho`.
    ///
    /// # Errors
    /// [`PricingError::InvalidParameter`] if `rho` is not in `[-1, 1]`.
    pub fn new(seed: u64, rho: f64) -> Result<Self, PricingError> {
        if !(-1.0..=1.0).contains(&rho) {
            return Err(PricingError::invalid(
                "rho",
                format!("must lie in [-1, 1], got {}", rho),
            ));
        }
        Ok(Self {
            seed,
            rho,
            rho_complement: (1.0 - rho * rho).max(0.0).sqrt(),
        })
    }

    /// Request seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Correlation between the two increments.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Stream for path `path_index`.
    #[inline]
    pub fn stream(&self, path_index: usize) -> CorrelatedNormalStream {
        CorrelatedNormalStream {
            rng: PricerRng::for_path(self.seed, path_index),
            rho: self.rho,
            rho_complement: self.rho_complement,
        }
    }
}

/// Sequence of correlated standard normal pairs for a single path.
pub struct CorrelatedNormalStream {
    rng: PricerRng,
    rho: f64,
    rho_complement: f64,
}

impl CorrelatedNormalStream {
    /// Next `(dW_S, dW_v)` pair:
    ///
    /// ```text
    /// dW_S = z1
    /// dW_v = rho * z1 + sqrt(1 - rho^2) * z2
    /// ```
    #[inline]
    pub fn next_increments(&mut self) -> (f64, f64) {
        let z1 = self.rng.gen_normal();
        let z2 = self.rng.gen_normal();
        (z1, self.rho * z1 + self.rho_complement * z2)
    }
}
