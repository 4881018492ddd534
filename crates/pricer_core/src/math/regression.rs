//! Least-squares polynomial regression.
//!
//! Fits `y ≈ Σ β_j (x / scale)^j` for `j = 0..=degree` by accumulating the
//! normal equations `XᵀX β = Xᵀy` in one pass over the samples and solving
//! them by Cholesky factorisation. Only the `(degree + 1)²` Gram matrix is
//! allocated, never the `n × (degree + 1)` design matrix, so the cost per fit
//! does not grow in memory with the number of samples. Scaling `x` (e.g. by
//! the strike) keeps the monomial columns of comparable magnitude.
//!
//! # Examples
//! ```
//! use pricer_core::math::regression::fit_polynomial;
//!
//! let xs = [1.0, 2.0, 3.0, 4.0];
//! let ys: Vec<f64> = xs.iter().map(|x| 1.0 + 2.0 * x + 0.5 * x * x).collect();
//!
//! let fit = fit_polynomial(&xs, &ys, 2, 1.0).unwrap();
//! assert!((fit.evaluate(5.0) - 23.5).abs() < 1e-9);
//! ```

use nalgebra::{DMatrix, DVector};

use crate::types::PricingError;

/// Relative tolerance on the diagonal of the Cholesky factor below which the
/// basis is treated as rank deficient.
///
/// The factor `L` of `XᵀX` equals `Rᵀ` from a QR of `X`; forming `XᵀX` squares
/// the condition number, so the tolerance sits near `sqrt(f64::EPSILON)`.
pub const RANK_TOLERANCE: f64 = 1e-7;

/// Fitted polynomial coefficients together with the input scale.
#[derive(Clone, Debug, PartialEq)]
pub struct LeastSquaresFit {
    coefficients: Vec<f64>,
    scale: f64,
}

impl LeastSquaresFit {
    /// Coefficients in ascending order of power, in scaled coordinates.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Divisor applied to `x` before evaluation.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Evaluates the fitted polynomial at `x` (Horner's scheme).
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        let u = x / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * u + c)
    }
}

/// Fits a polynomial of the given degree to `(xs, ys)` by least squares.
///
/// # Errors
/// - [`PricingError::InvalidParameter`] if the slices differ in length or
///   `scale` is not a positive finite number.
/// - [`PricingError::InsufficientSamples`] if there are fewer observations
///   than basis functions.
/// - [`PricingError::NumericalInstability`] if the inputs contain non-finite
///   values or the basis is rank deficient on the samples.
pub fn fit_polynomial(
    xs: &[f64],
    ys: &[f64],
    degree: usize,
    scale: f64,
) -> Result<LeastSquaresFit, PricingError> {
    if xs.len() != ys.len() {
        return Err(PricingError::invalid(
            "ys",
            format!("length {} does not match xs length {}", ys.len(), xs.len()),
        ));
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(PricingError::invalid(
            "scale",
            format!("must be positive and finite, got {}", scale),
        ));
    }

    let n_basis = degree + 1;
    let n_obs = xs.len();
    if n_obs < n_basis {
        return Err(PricingError::InsufficientSamples {
            got: n_obs,
            need: n_basis,
        });
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(PricingError::NumericalInstability(
            "non-finite regression input".to_string(),
        ));
    }

    let mut gram = DMatrix::<f64>::zeros(n_basis, n_basis);
    let mut moment = DVector::<f64>::zeros(n_basis);
    let mut powers = vec![0.0; n_basis];
    for (&x, &y) in xs.iter().zip(ys) {
        let u = x / scale;
        let mut p = 1.0;
        for power in powers.iter_mut() {
            *power = p;
            p *= u;
        }
        for j in 0..n_basis {
            moment[j] += powers[j] * y;
            for k in 0..=j {
                gram[(j, k)] += powers[j] * powers[k];
            }
        }
    }
    gram.fill_upper_triangle_with_lower_triangle();

    let rank_deficient = || {
        PricingError::NumericalInstability(format!(
            "basis is rank deficient ({} observations, {} basis functions)",
            n_obs, n_basis
        ))
    };
    let cholesky = gram.cholesky().ok_or_else(rank_deficient)?;

    let l = cholesky.l_dirty();
    let max_diag = (0..n_basis).map(|j| l[(j, j)]).fold(0.0_f64, f64::max);
    if (0..n_basis).any(|j| !(l[(j, j)] > RANK_TOLERANCE * max_diag)) {
        return Err(rank_deficient());
    }

    let beta = cholesky.solve(&moment);

    if beta.iter().any(|c| !c.is_finite()) {
        return Err(PricingError::NumericalInstability(
            "non-finite regression coefficients".to_string(),
        ));
    }

    Ok(LeastSquaresFit {
        coefficients: beta.iter().copied().collect(),
        scale,
    })
}
