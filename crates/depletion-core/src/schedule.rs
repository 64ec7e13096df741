//! Rewards schedule: daily-resampled table of expected reward rates.
//!
//! A [`RewardSchedule`] always holds at least one row, sorted by date with no
//! duplicates and no gaps. Missing calendar days are forward-filled from the
//! most recent earlier row when the schedule is built.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::constants::{ANNUALIZED_RATE_COLUMN, DATE_COLUMN, PER_EPOCH_RATE_COLUMN};
use crate::error::ScheduleError;
use crate::types::RewardScheduleRow;

/// Timestamp formats accepted in the date column besides a bare `%Y-%m-%d`.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct RewardSchedule {
    rows: Vec<RewardScheduleRow>,
}

impl RewardSchedule {
    /// Build a gapless daily schedule from unordered observations.
    pub fn from_rows(mut rows: Vec<RewardScheduleRow>) -> Result<Self, ScheduleError> {
        if rows.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if let Some(bad) = rows.iter().find(|r| {
            !r.annualized_rate_percent.is_finite() || !r.per_epoch_rate_percent.is_finite()
        }) {
            return Err(ScheduleError::NonFiniteRate(bad.date));
        }

        rows.sort_by_key(|r| r.date);
        if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ScheduleError::DuplicateDate(pair[0].date));
        }

        let observed = rows.len();
        let mut filled = Vec::with_capacity(observed);
        let mut iter = rows.into_iter().peekable();
        while let Some(row) = iter.next() {
            filled.push(row);
            if let Some(next) = iter.peek() {
                let gap = row
                    .date
                    .iter_days()
                    .skip(1)
                    .take_while(|d| *d < next.date)
                    .map(|date| RewardScheduleRow { date, ..row });
                filled.extend(gap);
            }
        }

        debug!(observed, days = filled.len(), "resampled schedule to daily rows");
        Ok(Self { rows: filled })
    }

    /// Load a schedule from a comma-separated file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ScheduleError::Io(format!("{}: {e}", path.display())))?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parse comma-separated text with a header row.
    ///
    /// Columns are located by header name; unknown columns are ignored.
    /// Quoted fields may span lines. Observations are ordered by full
    /// timestamp and each calendar day keeps its latest one.
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<Self, ScheduleError> {
        let mut lines = reader.lines().enumerate();

        let Some((_, header)) = next_record(&mut lines)? else {
            return Err(ScheduleError::Empty);
        };
        let column = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| ScheduleError::MissingColumn(name.to_string()))
        };
        let date_idx = column(DATE_COLUMN)?;
        let annual_idx = column(ANNUALIZED_RATE_COLUMN)?;
        let epoch_idx = column(PER_EPOCH_RATE_COLUMN)?;

        let mut observations = Vec::new();
        while let Some((line_no, fields)) = next_record(&mut lines)? {
            let field = |i: usize| {
                fields.get(i).map(|f| f.trim()).ok_or_else(|| ScheduleError::Parse {
                    line: line_no,
                    reason: format!("expected at least {} fields, got {}", i + 1, fields.len()),
                })
            };
            let raw_date = field(date_idx)?;
            let timestamp = parse_timestamp(raw_date).ok_or_else(|| ScheduleError::Parse {
                line: line_no,
                reason: format!("invalid date {raw_date:?}"),
            })?;
            let annualized_rate_percent = parse_rate(field(annual_idx)?, line_no)?;
            let per_epoch_rate_percent = parse_rate(field(epoch_idx)?, line_no)?;
            observations.push((
                timestamp,
                RewardScheduleRow::new(timestamp.date(), annualized_rate_percent, per_epoch_rate_percent),
            ));
        }

        Self::from_rows(latest_per_day(observations)?)
    }

    /// Write the schedule as comma-separated text with the standard headers.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{DATE_COLUMN},{ANNUALIZED_RATE_COLUMN},{PER_EPOCH_RATE_COLUMN}")?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{}",
                row.date, row.annualized_rate_percent, row.per_epoch_rate_percent
            )?;
        }
        writer.flush()
    }

    /// New schedule with the same dates and rates produced by `f`.
    ///
    /// `f` returns `(annualized_rate_percent, per_epoch_rate_percent)`.
    pub fn map_rates<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&RewardScheduleRow) -> (f64, f64),
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let (annualized_rate_percent, per_epoch_rate_percent) = f(row);
                RewardScheduleRow {
                    date: row.date,
                    annualized_rate_percent,
                    per_epoch_rate_percent,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[RewardScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> &RewardScheduleRow {
        &self.rows[0]
    }

    pub fn last(&self) -> &RewardScheduleRow {
        &self.rows[self.rows.len() - 1]
    }

    /// Row for an exact calendar day.
    pub fn get(&self, date: NaiveDate) -> Option<&RewardScheduleRow> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Rows dated strictly after `today`.
    pub fn future_rows(&self, today: NaiveDate) -> &[RewardScheduleRow] {
        let start = self.rows.partition_point(|r| r.date <= today);
        &self.rows[start..]
    }
}

fn parse_rate(field: &str, line: usize) -> Result<f64, ScheduleError> {
    field.parse::<f64>().map_err(|e| ScheduleError::Parse {
        line,
        reason: format!("invalid rate {field:?}: {e}"),
    })
}

fn parse_timestamp(field: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(field, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(field, fmt).ok())
}

/// Order observations by timestamp and keep the last one of each calendar day.
///
/// Only identical timestamps are rejected.
fn latest_per_day(
    mut observations: Vec<(NaiveDateTime, RewardScheduleRow)>,
) -> Result<Vec<RewardScheduleRow>, ScheduleError> {
    observations.sort_by_key(|(ts, _)| *ts);
    if let Some(pair) = observations.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(ScheduleError::DuplicateTimestamp(pair[0].0));
    }

    let mut rows: Vec<RewardScheduleRow> = Vec::with_capacity(observations.len());
    for (_, row) in observations {
        match rows.last_mut() {
            Some(last) if last.date == row.date => *last = row,
            _ => rows.push(row),
        }
    }
    Ok(rows)
}

/// Read the next non-blank record, joining physical lines while a quoted
/// field is still open. Returns the 1-based line the record starts on.
fn next_record<I>(lines: &mut I) -> Result<Option<(usize, Vec<String>)>, ScheduleError>
where
    I: Iterator<Item = (usize, io::Result<String>)>,
{
    let mut record = String::new();
    let mut start = None;

    for (idx, line) in lines.by_ref() {
        let line = line.map_err(|e| ScheduleError::Io(e.to_string()))?;
        let line = line.trim_end_matches('\r');
        match start {
            None if line.trim().is_empty() => continue,
            None => start = Some(idx + 1),
            Some(_) => record.push('\n'),
        }
        record.push_str(line);
        if record.matches('"').count() % 2 == 0 {
            return Ok(start.map(|line_no| (line_no, split_record(&record))));
        }
    }

    match start {
        None => Ok(None),
        Some(line) => Err(ScheduleError::Parse {
            line,
            reason: "unterminated quoted field".to_string(),
        }),
    }
}

/// Split one comma-separated record, honouring double-quoted fields.
fn split_record(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
