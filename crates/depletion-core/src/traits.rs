//! Trait interfaces for the depletion estimator.
//!
//! - [`Clock`] — source of the current calendar date (the front end injects it)
//! - [`DepletionCalculator`] — depletion math engine (depletion-engine implements)

use chrono::{Local, NaiveDate};

use crate::error::EstimateError;
use crate::schedule::RewardSchedule;
use crate::types::{EstimationResult, PolicyParameters};

/// Source of "today" for an estimate.
///
/// The estimator itself never reads the wall clock; callers resolve the date
/// through a `Clock` and pass it in.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Pure computation of common pool depletion.
///
/// Implementations must be deterministic in their inputs: the same schedule,
/// policy and `today` always produce the same result.
pub trait DepletionCalculator {
    /// Estimate the adjusted schedule and the epochs until the pool is exhausted.
    fn estimate(
        &self,
        schedule: &RewardSchedule,
        policy: &PolicyParameters,
        today: NaiveDate,
    ) -> Result<EstimationResult, EstimateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_returns_its_date() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn system_clock_is_after_2020() {
        let floor = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(SystemClock.today() > floor);
    }

    #[test]
    fn clock_usable_as_trait_object() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let clocks: Vec<Box<dyn Clock>> = vec![Box::new(FixedClock(date)), Box::new(SystemClock)];
        assert_eq!(clocks[0].today(), date);
    }
}
