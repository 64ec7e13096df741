//! Human-readable and JSON rendering of estimates.

use chrono::NaiveDate;
use depletion_core::schedule::RewardSchedule;
use depletion_core::types::EstimationResult;
use depletion_core::validation::ValidatedRequest;
use depletion_engine::EarningsProjection;
use serde_json::{json, Value};

/// Format with two decimals and comma thousands separators, e.g. `1,234.50`.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn depletion_line(projection: &EarningsProjection) -> String {
    format!(
        "{} YEARS Until Common Pool depletion",
        group_thousands(projection.years_to_depletion)
    )
}

pub fn earnings_line(projection: &EarningsProjection) -> String {
    format!(
        "${} is estimated Validator's monthly earnings when rewards drop to {}%",
        group_thousands(projection.monthly_earnings),
        group_thousands(projection.final_rate_percent)
    )
}

pub fn json_report(
    today: NaiveDate,
    request: &ValidatedRequest,
    result: &EstimationResult,
    projection: &EarningsProjection,
) -> Value {
    json!({
        "today": today,
        "inputs": request,
        "projection": projection,
        "estimate": result,
    })
}

/// Date span, row count and rate range of a schedule.
pub fn schedule_summary(schedule: &RewardSchedule) -> String {
    let (lo, hi) = schedule
        .rows()
        .iter()
        .map(|r| r.annualized_rate_percent)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r), hi.max(r)));
    format!(
        "{} days from {} to {}, annualized rewards {}% .. {}%",
        schedule.len(),
        schedule.first().date,
        schedule.last().date,
        group_thousands(lo),
        group_thousands(hi)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> EarningsProjection {
        EarningsProjection {
            epochs_to_depletion: 43_800.0,
            years_to_depletion: 5.0,
            final_rate_percent: 2.0,
            monthly_earnings: 1_266.666,
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0.0), "0.00");
        assert_eq!(group_thousands(999.994), "999.99");
        assert_eq!(group_thousands(1_000.0), "1,000.00");
        assert_eq!(group_thousands(741_546_689.0), "741,546,689.00");
        assert_eq!(group_thousands(-12_345.678), "-12,345.68");
        assert_eq!(group_thousands(-0.001), "0.00");
    }

    #[test]
    fn summary_reports_span_and_range() {
        use depletion_core::types::RewardScheduleRow;
        let d = |n| NaiveDate::from_ymd_opt(2023, 12, n).unwrap();
        let schedule = RewardSchedule::from_rows(vec![
            RewardScheduleRow::new(d(30), 12.5, 0.0014),
            RewardScheduleRow::new(d(31), 1_250.0, 0.0013),
        ])
        .unwrap();
        assert_eq!(
            schedule_summary(&schedule),
            "2 days from 2023-12-30 to 2023-12-31, annualized rewards 12.50% .. 1,250.00%"
        );
    }

    #[test]
    fn depletion_line_matches_form_wording() {
        assert_eq!(depletion_line(&projection()), "5.00 YEARS Until Common Pool depletion");
    }

    #[test]
    fn earnings_line_matches_form_wording() {
        assert_eq!(
            earnings_line(&projection()),
            "$1,266.67 is estimated Validator's monthly earnings when rewards drop to 2.00%"
        );
    }
}
