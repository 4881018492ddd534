//! Dividend forecasting from payment history.
//!
//! The most recent [`FORECAST_WINDOW`] payments give an average amount and an
//! average spacing in days. Payments are projected forward from the latest
//! historical date at that spacing, and those falling after the valuation date
//! and on or before `valuation_date + round(T * 365)` days are kept.

use chrono::{Days, NaiveDate};

use super::{DividendError, DividendEvent};

/// Number of most recent historical payments used for the forecast.
pub const FORECAST_WINDOW: usize = 4;

/// Maximum number of projected payments.
pub const MAX_FORECAST_DIVIDENDS: usize = 1_000;

/// Day count used to convert calendar days into year fractions.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A historical dividend payment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricalDividend {
    /// Payment date.
    pub date: NaiveDate,
    /// Cash amount per share.
    pub amount: f64,
}

/// A projected dividend payment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForecastDividend {
    /// Projected payment date.
    pub date: NaiveDate,
    /// Projected amount (window average).
    pub amount: f64,
    /// Year fraction from the valuation date.
    pub time: f64,
}

impl ForecastDividend {
    /// The simulation event for this payment.
    pub fn to_event(&self) -> DividendEvent {
        DividendEvent::new(self.time, self.amount)
    }
}

/// Projects dividends over `(valuation_date, valuation_date + T]`.
///
/// Fewer than two historical payments, or a non-positive horizon, yield an
/// empty forecast.
///
/// # Errors
/// - [`DividendError::NonFinite`] / [`DividendError::NegativeAmount`] for bad
///   amounts in the window
/// - [`DividendError::DegenerateHistory`] if the average spacing rounds to
///   zero days
/// - [`DividendError::TooManyForecast`] if more than
///   [`MAX_FORECAST_DIVIDENDS`] payments fall inside the horizon
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_models::dividends::{forecast_dividends, HistoricalDividend};
///
/// let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let history = vec![
///     HistoricalDividend { date: date(2024, 2, 15), amount: 0.24 },
///     HistoricalDividend { date: date(2024, 5, 15), amount: 0.25 },
///     HistoricalDividend { date: date(2024, 8, 15), amount: 0.25 },
///     HistoricalDividend { date: date(2024, 11, 15), amount: 0.26 },
/// ];
///
/// let forecast = forecast_dividends(&history, date(2024, 12, 1), 0.5).unwrap();
/// assert_eq!(forecast.len(), 2);
/// assert!((forecast[0].amount - 0.25).abs() < 1e-12);
/// ```
pub fn forecast_dividends(
    history: &[HistoricalDividend],
    valuation_date: NaiveDate,
    time_to_expiry: f64,
) -> Result<Vec<ForecastDividend>, DividendError> {
    if history.len() < 2 || !(time_to_expiry.is_finite() && time_to_expiry > 0.0) {
        return Ok(Vec::new());
    }

    // Most recent first.
    let mut recent: Vec<(usize, &HistoricalDividend)> = history.iter().enumerate().collect();
    recent.sort_by(|a, b| b.1.date.cmp(&a.1.date));
    recent.truncate(FORECAST_WINDOW);

    for &(index, payment) in &recent {
        if !payment.amount.is_finite() {
            return Err(DividendError::NonFinite { index });
        }
        if payment.amount < 0.0 {
            return Err(DividendError::NegativeAmount {
                index,
                amount: payment.amount,
            });
        }
    }

    let avg_amount = recent.iter().map(|(_, p)| p.amount).sum::<f64>() / recent.len() as f64;
    let total_days: i64 = recent
        .windows(2)
        .map(|pair| (pair[0].1.date - pair[1].1.date).num_days())
        .sum();
    let avg_interval = (total_days as f64 / (recent.len() - 1) as f64).round();
    if avg_interval < 1.0 {
        return Err(DividendError::DegenerateHistory);
    }
    let interval_days = avg_interval as u64;
    let interval = Days::new(interval_days);

    let horizon_days = (time_to_expiry * DAYS_PER_YEAR).round() as u64;
    let Some(end_date) = valuation_date.checked_add_days(Days::new(horizon_days)) else {
        return Ok(Vec::new());
    };

    // First projection strictly after the valuation date.
    let latest = recent[0].1.date;
    let gap_days = (valuation_date - latest).num_days().max(0) as u64;
    let first = (gap_days / interval_days + 1)
        .checked_mul(interval_days)
        .and_then(|days| latest.checked_add_days(Days::new(days)));
    let Some(mut date) = first else {
        return Ok(Vec::new());
    };

    let mut forecast = Vec::new();
    while date <= end_date {
        if forecast.len() == MAX_FORECAST_DIVIDENDS {
            return Err(DividendError::TooManyForecast {
                limit: MAX_FORECAST_DIVIDENDS,
            });
        }
        let days = (date - valuation_date).num_days();
        forecast.push(ForecastDividend {
            date,
            amount: avg_amount,
            time: days as f64 / DAYS_PER_YEAR,
        });
        let Some(next) = date.checked_add_days(interval) else {
            break;
        };
        date = next;
    }

    Ok(forecast)
}
