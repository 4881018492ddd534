//! Standard normal cumulative distribution function.
//!
//! Generic over `T: Float` so the Black-Scholes formulas can be evaluated in
//! `f32` as well as `f64`.

use num_traits::Float;

/// Converts an `f64` literal into `T`, falling back to NaN if `T` cannot
/// represent it.
#[inline]
pub(crate) fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Complementary error function, Abramowitz and Stegun 7.1.26.
///
/// Maximum absolute error 1.5e-7.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let abs_x = x.abs();
    let t = T::one() / (T::one() + lit::<T>(0.327_591_1) * abs_x);

    // Horner's method
    let poly = lit::<T>(0.254_829_592)
        + t * (lit::<T>(-0.284_496_736)
            + t * (lit::<T>(1.421_413_741)
                + t * (lit::<T>(-1.453_152_027) + t * lit::<T>(1.061_405_429))));

    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    // erfc(-x) = 2 - erfc(x)
    if x < T::zero() {
        lit::<T>(2.0) - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal CDF, `Φ(x) = erfc(-x / √2) / 2`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    lit::<T>(0.5) * erfc_approx(-x / lit::<T>(std::f64::consts::SQRT_2))
}
