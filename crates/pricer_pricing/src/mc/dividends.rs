//! Discrete dividend drops on the simulation grid.
//!
//! Each dividend with time strictly inside `(0, T)` is mapped to step
//! `round(time / dt)`, clamped to `[1, n_steps]`. The path simulator
//! subtracts the accumulated drop right after computing the price at that
//! step, so later steps evolve from the post-dividend price.

use pricer_models::dividends::DividendSchedule;

/// Lower bound applied to every simulated price, after the Heston step and
/// after a dividend drop.
pub const PRICE_FLOOR: f64 = 1e-8;

/// A dividend that was placed on the simulation grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedDividend {
    /// Ex-dividend time in years.
    pub time: f64,
    /// Cash amount.
    pub amount: f64,
    /// Grid step at which the price drops.
    pub step: usize,
}

/// Per-step dividend drops for one simulation grid.
#[derive(Clone, Debug, PartialEq)]
pub struct DividendAdjuster {
    /// `drops[t]` is the total cash dropped at step `t`; length `n_steps + 1`.
    drops: Vec<f64>,
    applied: Vec<AppliedDividend>,
}

impl DividendAdjuster {
    /// Maps `schedule` onto a grid of `n_steps` steps over `[0, time_to_expiry]`.
    ///
    /// `n_steps` must be at least 1 and `time_to_expiry` positive; both are
    /// guaranteed by a validated request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_models::dividends::{DividendEvent, DividendSchedule};
    /// use pricer_pricing::mc::DividendAdjuster;
    ///
    /// let schedule = DividendSchedule::new(vec![
    ///     DividendEvent::new(0.5, 2.0),
    ///     DividendEvent::new(1.0, 9.0), // at expiry: ignored
    /// ])
    /// .unwrap();
    ///
    /// let adjuster = DividendAdjuster::new(&schedule, 1.0, 4);
    /// assert_eq!(adjuster.applied().len(), 1);
    /// assert_eq!(adjuster.applied()[0].step, 2);
    /// assert_eq!(adjuster.adjust(2, 100.0), 98.0);
    /// assert_eq!(adjuster.adjust(3, 100.0), 100.0);
    /// ```
    pub fn new(schedule: &DividendSchedule, time_to_expiry: f64, n_steps: usize) -> Self {
        let mut drops = vec![0.0; n_steps + 1];
        let dt = time_to_expiry / n_steps as f64;

        let applied: Vec<AppliedDividend> = schedule
            .within_horizon(time_to_expiry)
            .map(|event| {
                let step = ((event.time / dt).round() as usize).clamp(1, n_steps.max(1));
                AppliedDividend {
                    time: event.time,
                    amount: event.amount,
                    step,
                }
            })
            .collect();

        for dividend in &applied {
            if let Some(drop) = drops.get_mut(dividend.step) {
                *drop += dividend.amount;
            }
        }

        Self { drops, applied }
    }

    /// An adjuster that never changes prices.
    pub fn none(n_steps: usize) -> Self {
        Self {
            drops: vec![0.0; n_steps + 1],
            applied: Vec::new(),
        }
    }

    /// Price after the drop scheduled at `step`, floored at [`PRICE_FLOOR`].
    #[inline]
    pub fn adjust(&self, step: usize, price: f64) -> f64 {
        match self.drops.get(step) {
            Some(&drop) if drop > 0.0 => (price - drop).max(PRICE_FLOOR),
            _ => price,
        }
    }

    /// Total drop scheduled at `step`.
    #[inline]
    pub fn drop_at(&self, step: usize) -> f64 {
        self.drops.get(step).copied().unwrap_or(0.0)
    }

    /// Dividends placed on the grid, in schedule order.
    pub fn applied(&self) -> &[AppliedDividend] {
        &self.applied
    }

    /// Sum of all applied amounts.
    pub fn total(&self) -> f64 {
        self.applied.iter().map(|d| d.amount).sum()
    }

    /// Returns `true` if no dividend falls inside the horizon.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Present value at time 0 of the applied dividends under rate `rate`.
    pub fn present_value(&self, rate: f64) -> f64 {
        self.applied
            .iter()
            .map(|d| d.amount * (-rate * d.time).exp())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::dividends::DividendEvent;
    use proptest::prelude::*;

    fn schedule(events: &[(f64, f64)]) -> DividendSchedule {
        DividendSchedule::new(
            events
                .iter()
                .map(|&(t, a)| DividendEvent::new(t, a))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_step_mapping_rounds_to_nearest() {
        // dt = 0.1: 0.26 -> 2.6 -> 3, 0.24 -> 2.4 -> 2
        let adjuster = DividendAdjuster::new(&schedule(&[(0.24, 1.0), (0.26, 1.0)]), 1.0, 10);
        let steps: Vec<usize> = adjuster.applied().iter().map(|d| d.step).collect();
        assert_eq!(steps, vec![2, 3]);
    }

    #[test]
    fn test_early_dividend_clamped_to_first_step() {
        let adjuster = DividendAdjuster::new(&schedule(&[(0.01, 1.0)]), 1.0, 10);
        assert_eq!(adjuster.applied()[0].step, 1);
    }

    #[test]
    fn test_late_dividend_clamped_to_last_step() {
        let adjuster = DividendAdjuster::new(&schedule(&[(0.99, 1.0)]), 1.0, 10);
        assert_eq!(adjuster.applied()[0].step, 10);
    }

    #[test]
    fn test_out_of_horizon_dividends_ignored() {
        let adjuster =
            DividendAdjuster::new(&schedule(&[(0.0, 1.0), (1.0, 1.0), (2.5, 1.0)]), 1.0, 10);
        assert!(adjuster.is_empty());
        assert_eq!(adjuster.total(), 0.0);
        for step in 0..=10 {
            assert_eq!(adjuster.drop_at(step), 0.0);
        }
    }

    #[test]
    fn test_same_step_dividends_accumulate() {
        let adjuster = DividendAdjuster::new(&schedule(&[(0.5, 1.0), (0.51, 2.0)]), 1.0, 10);
        assert_eq!(adjuster.applied().len(), 2);
        assert_relative_eq!(adjuster.drop_at(5), 3.0);
        assert_relative_eq!(adjuster.adjust(5, 50.0), 47.0);
        assert_relative_eq!(adjuster.total(), 3.0);
    }

    #[test]
    fn test_price_floor() {
        let adjuster = DividendAdjuster::new(&schedule(&[(0.5, 1_000.0)]), 1.0, 10);
        assert_eq!(adjuster.adjust(5, 10.0), PRICE_FLOOR);
    }

    #[test]
    fn test_present_value() {
        let adjuster = DividendAdjuster::new(&schedule(&[(0.5, 2.0)]), 1.0, 4);
        assert_relative_eq!(
            adjuster.present_value(0.05),
            2.0 * (-0.025_f64).exp(),
            epsilon = 1e-14
        );
        assert_eq!(DividendAdjuster::none(4).present_value(0.05), 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_adjusted_price_stays_positive(
            price in 1e-6_f64..1e4,
            amount in 0.0_f64..1e5,
            time in 0.001_f64..0.999,
            n_steps in 1_usize..500,
        ) {
            let adjuster = DividendAdjuster::new(&schedule(&[(time, amount)]), 1.0, n_steps);
            for step in 0..=n_steps {
                prop_assert!(adjuster.adjust(step, price) > 0.0);
            }
            let step = adjuster.applied()[0].step;
            prop_assert!((1..=n_steps).contains(&step));
        }
    }
}
