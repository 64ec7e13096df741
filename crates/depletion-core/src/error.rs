//! Error types for the depletion estimator.
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("io: {0}")] Io(String),
    #[error("missing column: {0}")] MissingColumn(String),
    #[error("line {line}: {reason}")] Parse { line: usize, reason: String },
    #[error("empty schedule")] Empty,
    #[error("duplicate date: {0}")] DuplicateDate(NaiveDate),
    #[error("duplicate timestamp: {0}")] DuplicateTimestamp(NaiveDateTime),
    #[error("non-finite rate on {0}")] NonFiniteRate(NaiveDate),
}

/// Caller-level validation failure. The computation is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("missing value: {0}")] Missing(&'static str),
    #[error("{field} is not a finite number")] NotFinite { field: &'static str },
    #[error("{field} must not be negative")] Negative { field: &'static str },
    #[error("{field} out of range: {value} not in [{min}, {max}]")] OutOfRange { field: &'static str, value: String, min: String, max: String },
    #[error("staked tokens must be positive")] NoStake,
    #[error("staked tokens {staked} less than validator stake {validator}")] StakeBelowValidator { staked: String, validator: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("no future schedule rows at or below the {cap_percent}% cap")] DegenerateSelection { cap_percent: f64 },
    #[error("numeric domain error: {0}")] NumericDomain(String),
}

#[derive(Error, Debug)]
pub enum DepletionError {
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error("invalid input: {0}")] InvalidInput(#[from] InputError),
    #[error(transparent)] Estimate(#[from] EstimateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_selection_names_cap() {
        let err = EstimateError::DegenerateSelection { cap_percent: 0.0 };
        assert_eq!(err.to_string(), "no future schedule rows at or below the 0% cap");
    }

    #[test]
    fn input_error_wraps_as_invalid_input() {
        let err: DepletionError = InputError::Missing("cap_percent").into();
        assert_eq!(err.to_string(), "invalid input: missing value: cap_percent");
    }

    #[test]
    fn schedule_parse_error_carries_line() {
        let err = ScheduleError::Parse { line: 4, reason: "bad date".into() };
        assert_eq!(err.to_string(), "line 4: bad date");
    }
}
