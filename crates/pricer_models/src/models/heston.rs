//! Heston確率的ボラティリティモデル
//!
//! Hestonモデルは以下のSDEで記述される:
//! ```text
//! dS = r * S * dt + sqrt(v) * S * dW_S
//! dv = kappa * (theta_var - v) * dt + sigma_var * sqrt(v) * dW_v
//! E[dW_S * dW_v] = rho * dt
//! ```
//! ここで:
//! - S = 資産価格
//! - v = 瞬間分散
//! - kappa = 平均回帰速度
//! - theta_var = 長期分散
//! - sigma_var = ボラティリティのボラティリティ (vol-of-vol)
//! - rho = 資産価格と分散の相関
//!
//! ## 離散化スキーム
//!
//! 分散はfull truncation Eulerで更新し、各ステップで0に切り上げる。
//! 価格はlog-Eulerで更新するため、離散化誤差に関わらず正値を保つ:
//! ```text
//! v_{t+1} = max(v_t + kappa*(theta_var - v_t)*dt + sigma_var*sqrt(max(v_t,0))*sqrt(dt)*dW_v, 0)
//! S_{t+1} = S_t * exp((r - 0.5*v_t)*dt + sqrt(max(v_t,0)*dt)*dW_S)
//! ```
//!
//! ## 使用例
//!
//! ```
//! use pricer_models::models::heston::HestonParams;
//!
//! let params = HestonParams::new(
//!     2.0,   // kappa
//!     0.04,  // theta_var
//!     0.3,   // sigma_var
//!     -0.7,  // rho
//!     0.04,  // v0
//! )
//! .unwrap();
//! assert!(params.satisfies_feller());
//! assert!((params.initial_volatility() - 0.2).abs() < 1e-12);
//! ```

use pricer_core::types::PricingError;
use thiserror::Error;

/// Hestonモデルエラー型
///
/// パラメータ検証時のエラーを表現する。
///
/// # 例
///
/// ```
/// use pricer_models::models::heston::HestonError;
///
/// let err = HestonError::InvalidRho(1.5);
/// assert!(format!("{}", err).contains("1.5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// 無効な平均回帰速度（非負でなければならない）
    #[error("kappa must be non-negative, got {0}")]
    InvalidKappa(f64),

    /// 無効な長期分散（非負でなければならない）
    #[error("thetaVar must be non-negative, got {0}")]
    InvalidThetaVar(f64),

    /// 無効なvol-of-vol（非負でなければならない）
    #[error("sigmaVar must be non-negative, got {0}")]
    InvalidSigmaVar(f64),

    /// 無効な相関係数（[-1, 1]の範囲内でなければならない）
    #[error("rho must lie in [-1, 1], got {0}")]
    InvalidRho(f64),

    /// 無効な初期分散（非負でなければならない）
    #[error("v0 must be non-negative, got {0}")]
    InvalidV0(f64),

    /// NaNまたは無限大が検出された
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

impl HestonError {
    /// エラーに対応するパラメータ名（リクエストJSONのキー名）
    pub fn parameter_name(&self) -> &'static str {
        match self {
            HestonError::InvalidKappa(_) => "kappa",
            HestonError::InvalidThetaVar(_) => "thetaVar",
            HestonError::InvalidSigmaVar(_) => "sigmaVar",
            HestonError::InvalidRho(_) => "rho",
            HestonError::InvalidV0(_) => "v0",
            HestonError::NonFinite(name) => *name,
        }
    }
}

impl From<HestonError> for PricingError {
    fn from(err: HestonError) -> Self {
        PricingError::InvalidParameter {
            name: err.parameter_name(),
            reason: err.to_string(),
        }
    }
}

/// Hestonモデルパラメータ
///
/// 構築時に一度だけ検証され、以降は不変。
///
/// # フィールド
///
/// * `kappa` - 平均回帰速度 (kappa >= 0)
/// * `theta_var` - 長期分散 (theta_var >= 0)
/// * `sigma_var` - vol-of-vol (sigma_var >= 0)
/// * `rho` - 相関係数 (-1 <= rho <= 1)
/// * `v0` - 初期分散 (v0 >= 0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonParams {
    kappa: f64,
    theta_var: f64,
    sigma_var: f64,
    rho: f64,
    v0: f64,
}

impl HestonParams {
    /// 新しいHestonパラメータを作成（検証付き）
    ///
    /// # 例
    ///
    /// ```
    /// use pricer_models::models::heston::{HestonError, HestonParams};
    ///
    /// assert!(HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).is_ok());
    ///
    /// // 相関が範囲外
    /// assert_eq!(
    ///     HestonParams::new(2.0, 0.04, 0.3, -1.2, 0.04),
    ///     Err(HestonError::InvalidRho(-1.2))
    /// );
    /// ```
    pub fn new(
        kappa: f64,
        theta_var: f64,
        sigma_var: f64,
        rho: f64,
        v0: f64,
    ) -> Result<Self, HestonError> {
        let params = Self {
            kappa,
            theta_var,
            sigma_var,
            rho,
            v0,
        };
        params.validate()?;
        Ok(params)
    }

    /// パラメータを検証
    pub fn validate(&self) -> Result<(), HestonError> {
        let named = [
            ("kappa", self.kappa),
            ("thetaVar", self.theta_var),
            ("sigmaVar", self.sigma_var),
            ("rho", self.rho),
            ("v0", self.v0),
        ];
        if let Some((name, _)) = named.iter().find(|(_, value)| !value.is_finite()) {
            return Err(HestonError::NonFinite(*name));
        }

        if self.kappa < 0.0 {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if self.theta_var < 0.0 {
            return Err(HestonError::InvalidThetaVar(self.theta_var));
        }
        if self.sigma_var < 0.0 {
            return Err(HestonError::InvalidSigmaVar(self.sigma_var));
        }
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        if self.v0 < 0.0 {
            return Err(HestonError::InvalidV0(self.v0));
        }

        Ok(())
    }

    /// 平均回帰速度
    #[inline]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// 長期分散
    #[inline]
    pub fn theta_var(&self) -> f64 {
        self.theta_var
    }

    /// vol-of-vol
    #[inline]
    pub fn sigma_var(&self) -> f64 {
        self.sigma_var
    }

    /// 相関係数
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// 初期分散
    #[inline]
    pub fn v0(&self) -> f64 {
        self.v0
    }

    /// 初期ボラティリティ `sqrt(v0)`
    pub fn initial_volatility(&self) -> f64 {
        self.v0.sqrt()
    }

    /// 長期ボラティリティ `sqrt(theta_var)`
    pub fn long_run_volatility(&self) -> f64 {
        self.theta_var.sqrt()
    }

    /// Feller条件をチェック (2 * kappa * theta_var > sigma_var^2)
    ///
    /// full truncationを使うため、条件を満たさなくてもシミュレーションは可能。
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta_var > self.sigma_var * self.sigma_var
    }

    /// 1ステップ分の (S, v) 更新
    ///
    /// 価格ステップは更新前の分散 `v_t` を使う。
    ///
    /// # 引数
    ///
    /// * `spot` - 現在の価格 S_t
    /// * `variance` - 現在の分散 v_t
    /// * `rate` - リスクフリーレート
    /// * `dt` - タイムステップ
    /// * `dw_s` - 価格用の相関済み標準正規増分
    /// * `dw_v` - 分散用の相関済み標準正規増分
    ///
    /// # 戻り値
    ///
    /// (S_{t+1}, v_{t+1})
    #[inline]
    pub fn step(
        &self,
        spot: f64,
        variance: f64,
        rate: f64,
        dt: f64,
        dw_s: f64,
        dw_v: f64,
    ) -> (f64, f64) {
        let v_pos = variance.max(0.0);
        let sqrt_v = v_pos.sqrt();
        let sqrt_dt = dt.sqrt();

        let v_next = (variance
            + self.kappa * (self.theta_var - variance) * dt
            + self.sigma_var * sqrt_v * sqrt_dt * dw_v)
            .max(0.0);

        let s_next = spot * ((rate - 0.5 * variance) * dt + sqrt_v * sqrt_dt * dw_s).exp();

        (s_next, v_next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference() -> HestonParams {
        HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04).unwrap()
    }

    // ==========================================================
    // パラメータ検証
    // ==========================================================

    #[test]
    fn test_valid_params() {
        let p = reference();
        assert_eq!(p.kappa(), 2.0);
        assert_eq!(p.theta_var(), 0.04);
        assert_eq!(p.sigma_var(), 0.3);
        assert_eq!(p.rho(), -0.7);
        assert_eq!(p.v0(), 0.04);
    }

    #[test]
    fn test_boundary_values_are_accepted() {
        assert!(HestonParams::new(0.0, 0.0, 0.0, -1.0, 0.0).is_ok());
        assert!(HestonParams::new(0.0, 0.0, 0.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_rho() {
        assert_eq!(
            HestonParams::new(2.0, 0.04, 0.3, 1.01, 0.04),
            Err(HestonError::InvalidRho(1.01))
        );
    }

    #[test]
    fn test_negative_parameters() {
        assert_eq!(
            HestonParams::new(-1.0, 0.04, 0.3, 0.0, 0.04),
            Err(HestonError::InvalidKappa(-1.0))
        );
        assert_eq!(
            HestonParams::new(1.0, -0.04, 0.3, 0.0, 0.04),
            Err(HestonError::InvalidThetaVar(-0.04))
        );
        assert_eq!(
            HestonParams::new(1.0, 0.04, -0.3, 0.0, 0.04),
            Err(HestonError::InvalidSigmaVar(-0.3))
        );
        assert_eq!(
            HestonParams::new(1.0, 0.04, 0.3, 0.0, -0.04),
            Err(HestonError::InvalidV0(-0.04))
        );
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(
            HestonParams::new(1.0, f64::NAN, 0.3, 0.0, 0.04),
            Err(HestonError::NonFinite("thetaVar"))
        );
    }

    #[test]
    fn test_conversion_to_pricing_error() {
        let err: PricingError = HestonError::InvalidRho(2.0).into();
        match err {
            PricingError::InvalidParameter { name, reason } => {
                assert_eq!(name, "rho");
                assert!(reason.contains("[-1, 1]"));
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_feller_condition() {
        // 2 * 2.0 * 0.04 = 0.16 > 0.09
        assert!(reference().satisfies_feller());
        // 2 * 0.5 * 0.04 = 0.04 < 0.25
        let p = HestonParams::new(0.5, 0.04, 0.5, -0.7, 0.04).unwrap();
        assert!(!p.satisfies_feller());
    }

    // ==========================================================
    // 離散化ステップ
    // ==========================================================

    #[test]
    fn test_zero_shock_step_is_deterministic_drift() {
        let p = reference();
        let dt = 0.01;
        let (s, v) = p.step(100.0, 0.09, 0.05, dt, 0.0, 0.0);
        assert_relative_eq!(v, 0.09 + 2.0 * (0.04 - 0.09) * dt, epsilon = 1e-15);
        assert_relative_eq!(s, 100.0 * ((0.05 - 0.045) * dt).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_variance_is_truncated_at_zero() {
        let p = reference();
        let (_, v) = p.step(100.0, 0.0001, 0.05, 1.0, 0.0, -10.0);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_zero_variance_has_no_diffusion() {
        let p = HestonParams::new(2.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let (s, v) = p.step(100.0, 0.0, 0.05, 0.5, 3.0, 3.0);
        assert_relative_eq!(s, 100.0 * (0.025_f64).exp(), epsilon = 1e-12);
        assert_eq!(v, 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_step_preserves_positivity(
            spot in 1e-6_f64..1e6,
            variance in 0.0_f64..2.0,
            dw_s in -8.0_f64..8.0,
            dw_v in -8.0_f64..8.0,
            sigma_var in 0.0_f64..2.0,
        ) {
            let p = HestonParams::new(3.0, 0.04, sigma_var, -0.7, variance).unwrap();
            let (s, v) = p.step(spot, variance, 0.05, 1.0 / 252.0, dw_s, dw_v);
            prop_assert!(s > 0.0);
            prop_assert!(v >= 0.0);
        }
    }
}
