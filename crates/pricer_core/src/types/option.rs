//! Option type (call or put).

use std::fmt;
use std::str::FromStr;

use super::error::PricingError;

/// Payoff direction of a vanilla option.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// let put: OptionType = "PUT".parse().unwrap();
/// assert_eq!(put, OptionType::Put);
/// assert_eq!(put.intrinsic(80.0, 100.0), 20.0);
/// assert_eq!(OptionType::Call.intrinsic(80.0, 100.0), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy at the strike: `max(S - K, 0)`.
    Call,
    /// Right to sell at the strike: `max(K - S, 0)`.
    Put,
}

impl OptionType {
    /// Immediate exercise value at spot `spot` for strike `strike`.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Lowercase wire name (`"call"` / `"put"`).
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(PricingError::invalid(
                "callOrPut",
                format!("must be \"call\" or \"put\", got \"{}\"", other),
            )),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
