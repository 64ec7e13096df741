//! Shared schedule builders for scenario and property tests.

use chrono::{Days, NaiveDate};
use depletion_core::schedule::RewardSchedule;
use depletion_core::types::{PolicyParameters, RewardScheduleRow};

/// Fixed "today" used by the suites.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// `today()` shifted by `offset` days (negative for the past).
pub fn day(offset: i64) -> NaiveDate {
    if offset >= 0 {
        today() + Days::new(offset as u64)
    } else {
        today() - Days::new(offset.unsigned_abs())
    }
}

/// Row whose per-epoch rate is `annual / 365`.
pub fn row(offset: i64, annual: f64) -> RewardScheduleRow {
    RewardScheduleRow::new(day(offset), annual, annual / 365.0)
}

/// Consecutive daily rows starting `start` days from today.
pub fn schedule_from(start: i64, annual_rates: &[f64]) -> RewardSchedule {
    let rows = annual_rates
        .iter()
        .enumerate()
        .map(|(i, &r)| row(start + i as i64, r))
        .collect();
    RewardSchedule::from_rows(rows).unwrap()
}

/// Consecutive daily rows starting tomorrow.
pub fn future_schedule(annual_rates: &[f64]) -> RewardSchedule {
    schedule_from(1, annual_rates)
}

pub fn policy(cap_percent: f64, common_pool_tokens: f64, staked_tokens: f64) -> PolicyParameters {
    PolicyParameters {
        cap_percent,
        common_pool_tokens,
        staked_tokens,
    }
}

/// CSV text in the published schedule layout for the given rows.
pub fn schedule_csv(rows: &[RewardScheduleRow]) -> String {
    let mut out = String::from("Epoch,Estimated date,Estimated annualized rewards %,Reward per epoch %\n");
    for (i, r) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{}\n",
            i * 24,
            r.date,
            r.annualized_rate_percent,
            r.per_epoch_rate_percent
        ));
    }
    out
}
