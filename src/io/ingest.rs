//! Flat-file ingestion for daily birth counts.
//!
//! Input files are whitespace-separated `MMDD count` records, one per line.
//! Records are summed into a fixed array of calendar-day slots. The default
//! day-of-year bucketing is the approximation `(month-1)*31 + day`, clamped
//! to the last slot; it misassigns many dates (and never fills slot 0) but is
//! kept for output compatibility with existing datasets. Calendar-accurate
//! bucketing is available through `ingest.calendar_accurate`.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::DagrConfig;
use crate::core::errors::{DagrError, Result};

/// Reference year used to resolve `MMDD` tokens in calendar-accurate mode.
/// A leap year, so Feb 29 resolves and lands on ordinal 59.
const LEAP_REFERENCE_YEAR: i32 = 2000;

/// Observed counts accumulated per calendar-day slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCounts {
    counts: Vec<f64>,
}

impl DailyCounts {
    /// Create a zero-initialized array with one slot per calendar day
    pub fn new(total_days: usize) -> Self {
        Self {
            counts: vec![0.0; total_days],
        }
    }

    /// Add a count to a day slot
    pub fn accumulate(&mut self, index: usize, count: f64) {
        self.counts[index] += count;
    }

    /// The counts as a slice, indexed by day slot
    pub fn as_slice(&self) -> &[f64] {
        &self.counts
    }

    /// Number of day slots
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the array has no slots
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all accumulated counts
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Consume the wrapper and return the raw array
    pub fn into_inner(self) -> Vec<f64> {
        self.counts
    }
}

/// Read and parse a `MMDD count` flat file into per-day sums
pub fn load_counts(path: impl AsRef<Path>, config: &DagrConfig) -> Result<DailyCounts> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        DagrError::io(format!("Failed to read data file: {}", path.display()), e)
    })?;

    parse_counts(&content, &path.display().to_string(), config)
}

/// Parse `MMDD count` records into per-day sums.
///
/// Blank lines are skipped; any malformed record is a parse error carrying
/// `source` and the 1-based line number.
pub fn parse_counts(content: &str, source: &str, config: &DagrConfig) -> Result<DailyCounts> {
    let total_days = config.population.total_days;
    if total_days == 0 {
        return Err(DagrError::config_field(
            "total_days must be positive",
            "population.total_days",
        ));
    }

    let mut counts = DailyCounts::new(total_days);
    let mut records = 0usize;

    for (line_index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let line_number = Some(line_index + 1);
        let mut tokens = line.split_whitespace();
        let (Some(date_token), Some(count_token), None) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(DagrError::parse_with_location(
                format!("expected 'MMDD count', got '{line}'"),
                source,
                line_number,
            ));
        };

        let (month, day) = parse_date_token(date_token, source, line_number)?;
        let count: f64 = count_token.parse().map_err(|_| {
            DagrError::parse_with_location(
                format!("count '{count_token}' is not a number"),
                source,
                line_number,
            )
        })?;
        if !count.is_finite() {
            return Err(DagrError::parse_with_location(
                format!("count '{count_token}' is not finite"),
                source,
                line_number,
            ));
        }

        let index = if config.ingest.calendar_accurate {
            day_of_year_calendar(month, day, source, line_number)?
        } else {
            day_of_year_approximate(month, day)
        };

        counts.accumulate(index.min(total_days - 1), count);
        records += 1;
    }

    debug!(records, total = counts.total(), "parsed {}", source);

    Ok(counts)
}

fn parse_date_token(token: &str, source: &str, line: Option<usize>) -> Result<(u32, u32)> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DagrError::parse_with_location(
            format!("date token '{token}' is not in MMDD form"),
            source,
            line,
        ));
    }

    let month: u32 = token[..2].parse().unwrap_or_default();
    let day: u32 = token[2..].parse().unwrap_or_default();

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(DagrError::parse_with_location(
            format!("date token '{token}' is out of range"),
            source,
            line,
        ));
    }

    Ok((month, day))
}

/// Approximate bucketing: 1-based day, every month treated as 31 days.
fn day_of_year_approximate(month: u32, day: u32) -> usize {
    (month as usize - 1) * 31 + day as usize
}

/// Calendar-accurate bucketing via the leap reference year
fn day_of_year_calendar(month: u32, day: u32, source: &str, line: Option<usize>) -> Result<usize> {
    let date = NaiveDate::from_ymd_opt(LEAP_REFERENCE_YEAR, month, day).ok_or_else(|| {
        DagrError::parse_with_location(
            format!("{month:02}{day:02} is not a valid calendar date"),
            source,
            line,
        )
    })?;

    Ok(date.ordinal0() as usize)
}
