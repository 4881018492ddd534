//! Discrete cash dividends.
//!
//! - [`DividendEvent`]: a single `(time, amount)` payment, time in years from
//!   valuation
//! - [`DividendSchedule`]: validated, time-ordered collection of events
//! - [`forecast`]: projection of future payments from historical ones
//!
//! ## Example
//!
//! ```
//! use pricer_models::dividends::{DividendEvent, DividendSchedule};
//!
//! let schedule = DividendSchedule::new(vec![
//!     DividendEvent::new(0.75, 0.5),
//!     DividendEvent::new(0.25, 0.5),
//!     DividendEvent::new(1.50, 0.5),
//! ])
//! .unwrap();
//!
//! // Sorted by time; only the first two fall strictly inside a one-year horizon.
//! assert_eq!(schedule.events()[0].time, 0.25);
//! assert_eq!(schedule.within_horizon(1.0).count(), 2);
//! ```

pub mod forecast;

pub use forecast::{
    forecast_dividends, ForecastDividend, HistoricalDividend, MAX_FORECAST_DIVIDENDS,
};

use pricer_core::types::PricingError;
use thiserror::Error;

/// Dividend validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DividendError {
    /// Amount is negative.
    #[error("dividend #{index} has negative amount {amount}")]
    NegativeAmount {
        /// Position in the input list.
        index: usize,
        /// The offending amount.
        amount: f64,
    },

    /// Time or amount is NaN or infinite.
    #[error("dividend #{index} has a non-finite time or amount")]
    NonFinite {
        /// Position in the input list.
        index: usize,
    },

    /// Historical payments share a date, so no payment interval exists.
    #[error("dividend history has no positive interval between payments")]
    DegenerateHistory,

    /// The history projects more payments over the horizon than allowed.
    #[error("dividend forecast exceeds {limit} projected payments")]
    TooManyForecast {
        /// Maximum number of projected payments.
        limit: usize,
    },
}

impl From<DividendError> for PricingError {
    fn from(err: DividendError) -> Self {
        let name = match err {
            DividendError::DegenerateHistory | DividendError::TooManyForecast { .. } => {
                "dividendHistory"
            }
            _ => "dividends",
        };
        PricingError::InvalidParameter {
            name,
            reason: err.to_string(),
        }
    }
}

/// A discrete cash dividend.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DividendEvent {
    /// Ex-dividend time in years from valuation.
    pub time: f64,
    /// Cash amount per share.
    pub amount: f64,
}

impl DividendEvent {
    /// Creates an event without validation; see [`DividendSchedule::new`].
    pub fn new(time: f64, amount: f64) -> Self {
        Self { time, amount }
    }

    /// Returns `true` if the event falls strictly inside `(0, horizon)`.
    #[inline]
    pub fn is_within(&self, horizon: f64) -> bool {
        self.time > 0.0 && self.time < horizon
    }
}

/// Time-ordered dividend events with finite times and non-negative amounts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DividendSchedule {
    events: Vec<DividendEvent>,
}

impl DividendSchedule {
    /// Validates and sorts `events` by time. Equal times keep input order.
    pub fn new(mut events: Vec<DividendEvent>) -> Result<Self, DividendError> {
        for (index, event) in events.iter().enumerate() {
            if !(event.time.is_finite() && event.amount.is_finite()) {
                return Err(DividendError::NonFinite { index });
            }
            if event.amount < 0.0 {
                return Err(DividendError::NegativeAmount {
                    index,
                    amount: event.amount,
                });
            }
        }
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { events })
    }

    /// Empty schedule.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All events, sorted by time.
    pub fn events(&self) -> &[DividendEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the schedule has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events with time strictly inside `(0, horizon)`.
    pub fn within_horizon(&self, horizon: f64) -> impl Iterator<Item = &DividendEvent> + '_ {
        self.events.iter().filter(move |e| e.is_within(horizon))
    }

    /// Returns a new schedule containing the events of both.
    pub fn merged(&self, other: &DividendSchedule) -> DividendSchedule {
        let mut events = self.events.clone();
        events.extend_from_slice(&other.events);
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        DividendSchedule { events }
    }
}
