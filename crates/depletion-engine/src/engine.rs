//! Depletion engine implementing the [`DepletionCalculator`] trait.
//!
//! The estimate runs in two phases over the rows dated after `today`:
//! rows above the cap compound the pool down day by day, then the rate locks
//! at the highest per-epoch rate among rows at or below the cap and the rest
//! of the pool drains at that constant rate.

use chrono::NaiveDate;
use depletion_core::constants::EPOCHS_PER_DAY;
use depletion_core::error::EstimateError;
use depletion_core::schedule::RewardSchedule;
use depletion_core::traits::DepletionCalculator;
use depletion_core::types::{
    EstimationResult, LockedRate, PolicyParameters, RewardScheduleRow,
};
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

/// The production depletion calculator.
#[derive(Debug, Clone, Default)]
pub struct DepletionEngine;

impl DepletionEngine {
    /// Create a new DepletionEngine.
    pub fn new() -> Self {
        Self
    }
}

/// Outcome of the decaying regime.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DecayPhase {
    /// Product of the daily compounding factors.
    multiplier: f64,
    pool_after: f64,
    epochs: f64,
}

/// Compound the rows still above the cap and draw the pool down accordingly.
fn decay_phase(
    future: &[RewardScheduleRow],
    cap_percent: f64,
    common_pool_tokens: f64,
) -> Result<DecayPhase, EstimateError> {
    let (days, multiplier) = future
        .iter()
        .filter(|row| row.is_above_cap(cap_percent))
        .fold((0u64, 1.0f64), |(days, acc), row| (days + 1, acc * row.daily_factor()));

    if !multiplier.is_finite() {
        return Err(EstimateError::NumericDomain(format!(
            "compounded multiplier over {days} days is not finite"
        )));
    }

    let pool_after = common_pool_tokens - common_pool_tokens * (multiplier - 1.0);
    Ok(DecayPhase {
        multiplier,
        pool_after,
        epochs: (days * EPOCHS_PER_DAY as u64) as f64,
    })
}

/// Highest rates among future rows at or below the cap.
///
/// The per-epoch and annualized maxima are taken independently.
fn locked_rate(future: &[RewardScheduleRow], cap_percent: f64) -> Result<LockedRate, EstimateError> {
    let capped = || future.iter().filter(move |row| !row.is_above_cap(cap_percent));

    let per_epoch = capped().map(|row| OrderedFloat(row.per_epoch_rate_percent)).max();
    let annualized = capped().map(|row| OrderedFloat(row.annualized_rate_percent)).max();

    match (per_epoch, annualized) {
        (Some(per_epoch), Some(annualized)) => Ok(LockedRate {
            per_epoch_rate_percent: per_epoch.into_inner(),
            annualized_rate_percent: annualized.into_inner(),
        }),
        _ => Err(EstimateError::DegenerateSelection { cap_percent }),
    }
}

/// Epochs for `staked` compounding at `1 + rate/100` per epoch to grow by `pool`.
///
/// Solves `staked * base^n = staked + pool` for `n`.
fn epochs_at_locked_rate(
    per_epoch_rate_percent: f64,
    pool: f64,
    staked_tokens: f64,
) -> Result<f64, EstimateError> {
    let base = 1.0 + per_epoch_rate_percent / 100.0;
    if base.is_nan() || base <= 0.0 || base == 1.0 {
        return Err(EstimateError::NumericDomain(format!(
            "logarithm base {base} from locked rate {per_epoch_rate_percent}% per epoch"
        )));
    }
    if !staked_tokens.is_finite() || staked_tokens <= 0.0 {
        return Err(EstimateError::NumericDomain(format!(
            "staked tokens must be positive, got {staked_tokens}"
        )));
    }

    let ratio = (staked_tokens + pool) / staked_tokens;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(EstimateError::NumericDomain(format!(
            "pool of {pool} tokens leaves no positive stake ratio ({ratio})"
        )));
    }

    Ok(ratio.ln() / base.ln())
}

impl DepletionCalculator for DepletionEngine {
    fn estimate(
        &self,
        schedule: &RewardSchedule,
        policy: &PolicyParameters,
        today: NaiveDate,
    ) -> Result<EstimationResult, EstimateError> {
        let cap = policy.cap_percent;
        if !cap.is_finite() || !policy.common_pool_tokens.is_finite() {
            return Err(EstimateError::NumericDomain(format!(
                "cap {cap}% and common pool {} must be finite",
                policy.common_pool_tokens
            )));
        }
        let future = schedule.future_rows(today);

        let decay = decay_phase(future, cap, policy.common_pool_tokens)?;
        debug!(
            %today,
            multiplier = decay.multiplier,
            pool_after = decay.pool_after,
            epochs = decay.epochs,
            "decay phase"
        );

        let locked = locked_rate(future, cap).inspect_err(|e| warn!(%today, cap, "{e}"))?;

        let adjusted_schedule = schedule.map_rates(|row| {
            if row.date > today && !row.is_above_cap(cap) {
                (locked.annualized_rate_percent, locked.per_epoch_rate_percent)
            } else {
                (row.annualized_rate_percent, row.per_epoch_rate_percent)
            }
        });

        let epochs_after =
            epochs_at_locked_rate(locked.per_epoch_rate_percent, decay.pool_after, policy.staked_tokens)
                .inspect_err(|e| warn!(%today, cap, "{e}"))?;
        debug!(
            locked_per_epoch = locked.per_epoch_rate_percent,
            locked_annualized = locked.annualized_rate_percent,
            epochs_after,
            "locked phase"
        );

        Ok(EstimationResult {
            adjusted_schedule,
            epochs_to_depletion: decay.epochs + epochs_after,
            epochs_before: decay.epochs,
            epochs_after,
            pool_after_decay: decay.pool_after,
            locked_rate: locked,
        })
    }
}

/// Estimate depletion with the production engine.
///
/// Returns the adjusted schedule and the total epochs until the common pool
/// is exhausted, as seen from `today`.
pub fn estimate(
    schedule: &RewardSchedule,
    cap_percent: f64,
    common_pool_tokens: f64,
    staked_tokens: f64,
    today: NaiveDate,
) -> Result<(RewardSchedule, f64), EstimateError> {
    let policy = PolicyParameters {
        cap_percent,
        common_pool_tokens,
        staked_tokens,
    };
    DepletionEngine::new()
        .estimate(schedule, &policy, today)
        .map(|r| (r.adjusted_schedule, r.epochs_to_depletion))
}
