//! Validator earnings once rewards settle at the final locked rate.

use depletion_core::constants::MONTHS_PER_YEAR;
use depletion_core::types::{EarningsInputs, EstimationResult};
use serde::Serialize;

/// Monthly earnings (in dollars) for a validator at `final_rate_percent`.
///
/// `(rate / 100 / 12) * stake * price * commission / 100`
pub fn monthly_earnings(
    final_rate_percent: f64,
    validator_stake: f64,
    token_price: f64,
    commission_percent: f64,
) -> f64 {
    (final_rate_percent / 100.0 / MONTHS_PER_YEAR as f64)
        * validator_stake
        * token_price
        * (commission_percent / 100.0)
}

/// Display-ready summary of one estimate.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct EarningsProjection {
    pub epochs_to_depletion: f64,
    pub years_to_depletion: f64,
    /// Annualized rate on the last scheduled day.
    pub final_rate_percent: f64,
    pub monthly_earnings: f64,
}

impl EarningsProjection {
    pub fn from_estimate(result: &EstimationResult, inputs: &EarningsInputs) -> Self {
        let final_rate_percent = result.final_annualized_rate();
        Self {
            epochs_to_depletion: result.epochs_to_depletion,
            years_to_depletion: result.years_to_depletion(),
            final_rate_percent,
            monthly_earnings: monthly_earnings(
                final_rate_percent,
                inputs.validator_stake,
                inputs.token_price,
                inputs.commission_percent,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use depletion_core::constants::EPOCHS_PER_YEAR;
    use depletion_core::schedule::RewardSchedule;
    use depletion_core::types::{LockedRate, RewardScheduleRow};

    #[test]
    fn stock_form_values() {
        // 2% of 20M tokens at $0.04 with 20% commission.
        let m = monthly_earnings(2.0, 20_000_000.0, 0.04, 20.0);
        assert!((m - 266.666_666_666_666_7).abs() < 1e-9, "got {m}");
    }

    #[test]
    fn zero_commission_earns_nothing() {
        assert_eq!(monthly_earnings(5.0, 1e6, 1.0, 0.0), 0.0);
    }

    #[test]
    fn linear_in_stake() {
        let a = monthly_earnings(3.0, 1_000.0, 2.0, 10.0);
        let b = monthly_earnings(3.0, 2_000.0, 2.0, 10.0);
        assert!((b - 2.0 * a).abs() < 1e-12);
    }

    #[test]
    fn projection_uses_last_adjusted_row() {
        let d = |n| NaiveDate::from_ymd_opt(2024, 5, n).unwrap();
        let schedule = RewardSchedule::from_rows(vec![
            RewardScheduleRow::new(d(1), 6.0, 6.0 / 365.0),
            RewardScheduleRow::new(d(2), 3.0, 3.0 / 365.0),
        ])
        .unwrap();
        let result = EstimationResult {
            adjusted_schedule: schedule,
            epochs_to_depletion: EPOCHS_PER_YEAR as f64 / 2.0,
            epochs_before: 24.0,
            epochs_after: EPOCHS_PER_YEAR as f64 / 2.0 - 24.0,
            pool_after_decay: 10.0,
            locked_rate: LockedRate {
                per_epoch_rate_percent: 3.0 / 365.0,
                annualized_rate_percent: 3.0,
            },
        };
        let inputs = EarningsInputs {
            validator_stake: 1_200.0,
            token_price: 1.0,
            commission_percent: 100.0,
        };
        let p = EarningsProjection::from_estimate(&result, &inputs);
        assert_eq!(p.final_rate_percent, 3.0);
        assert!((p.monthly_earnings - 3.0).abs() < 1e-12);
        assert!((p.years_to_depletion - 0.5).abs() < 1e-12);
    }
}
