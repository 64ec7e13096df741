//! Core estimator types: schedule rows, policy inputs, estimation results.
//!
//! Token amounts are plain `f64` token units. Rates are percents, so `2.0`
//! means 2%.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{EPOCHS_PER_DAY, EPOCHS_PER_YEAR};
use crate::schedule::RewardSchedule;

/// Expected reward rate for one calendar day.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RewardScheduleRow {
    /// Calendar day this rate applies to.
    pub date: NaiveDate,
    /// Yearly-equivalent reward rate implied by the per-epoch rate.
    pub annualized_rate_percent: f64,
    /// Reward rate applied once per epoch.
    pub per_epoch_rate_percent: f64,
}

impl RewardScheduleRow {
    pub fn new(date: NaiveDate, annualized_rate_percent: f64, per_epoch_rate_percent: f64) -> Self {
        Self {
            date,
            annualized_rate_percent,
            per_epoch_rate_percent,
        }
    }

    /// Compounded growth over one day: `(1 + per_epoch / 100) ^ EPOCHS_PER_DAY`.
    pub fn daily_factor(&self) -> f64 {
        (1.0 + self.per_epoch_rate_percent / 100.0).powi(EPOCHS_PER_DAY as i32)
    }

    /// Whether the annualized rate is still above `cap_percent` (decaying regime).
    pub fn is_above_cap(&self, cap_percent: f64) -> bool {
        self.annualized_rate_percent > cap_percent
    }
}

impl fmt::Display for RewardScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.4}% ({:.8}%/epoch)",
            self.date, self.annualized_rate_percent, self.per_epoch_rate_percent
        )
    }
}

/// Policy threshold and token-supply state at estimation time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PolicyParameters {
    /// Annualized rate at which reward reduction stops.
    pub cap_percent: f64,
    /// Tokens left in the common pool as of today.
    pub common_pool_tokens: f64,
    /// Tokens currently staked network-wide.
    pub staked_tokens: f64,
}

/// Validator-specific inputs for the monthly earnings projection.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EarningsInputs {
    /// Tokens delegated to the validator.
    pub validator_stake: f64,
    /// Token price in dollars.
    pub token_price: f64,
    /// Validator commission, in percent.
    pub commission_percent: f64,
}

/// The rate frozen once rewards would fall below the cap.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LockedRate {
    pub per_epoch_rate_percent: f64,
    pub annualized_rate_percent: f64,
}

/// Output of one depletion estimate.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EstimationResult {
    /// Input schedule with the post-cap future rows locked.
    pub adjusted_schedule: RewardSchedule,
    /// Total epochs until the common pool is exhausted.
    pub epochs_to_depletion: f64,
    /// Epochs spent in the decaying regime (whole days times 24).
    pub epochs_before: f64,
    /// Epochs paid out at the locked rate.
    pub epochs_after: f64,
    /// Common pool balance left when the rate locks.
    pub pool_after_decay: f64,
    pub locked_rate: LockedRate,
}

impl EstimationResult {
    /// Total epochs converted to 365-day years.
    pub fn years_to_depletion(&self) -> f64 {
        self.epochs_to_depletion / EPOCHS_PER_YEAR as f64
    }

    /// Annualized rate on the last day of the adjusted schedule.
    pub fn final_annualized_rate(&self) -> f64 {
        self.adjusted_schedule.last().annualized_rate_percent
    }
}
