//! Temporal types for consumption windows and reading timestamps
//!
//! This module provides:
//! - `ConsumptionWindow`: an inclusive calendar-date range normalized to
//!   UTC start-of-day / end-of-day boundaries
//! - `Timezone`: a chrono_tz wrapper for jurisdictions that bill in a
//!   local timezone
//! - `parse_reading_timestamp`: lenient parsing of caller-supplied
//!   reading timestamps

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use std::fmt;
use std::str::FromStr;

/// Timezone wrapper for billing jurisdictions
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Gets the start of day in this timezone as UTC.
    ///
    /// Normally local midnight; when a DST gap skips midnight, the first
    /// local time that exists after it. Ambiguous local times resolve to
    /// the earlier instant.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let mut naive = date.and_hms_opt(0, 0, 0).unwrap();
        loop {
            if let Some(dt) = naive.and_local_timezone(self.0).earliest() {
                return dt.with_timezone(&Utc);
            }
            naive += Duration::hours(1);
        }
    }

    /// Gets the end of day (23:59:59.999999999) in this timezone as UTC.
    ///
    /// Ambiguous local times resolve to the later instant; when a DST gap
    /// swallows the end of day, the last local time that exists before it.
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let mut naive = date.and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap();
        loop {
            if let Some(dt) = naive.and_local_timezone(self.0).latest() {
                return dt.with_timezone(&Utc);
            }
            naive -= Duration::hours(1);
        }
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: from {from} must not be after to {to}")]
    InvalidWindow {
        from: String,
        to: String,
    },

    #[error("Unparseable timestamp: {0}")]
    UnparseableTimestamp(String),
}

/// An inclusive calendar-date window over which readings are aggregated
///
/// Both bounds are inclusive. When converted to UTC instants, the window
/// spans `[start-of-day(from), end-of-day(to)]` in the given timezone
/// (UTC unless the caller bills in a local jurisdiction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionWindow {
    /// First day of the window (inclusive)
    pub from: NaiveDate,
    /// Last day of the window (inclusive)
    pub to: NaiveDate,
}

impl ConsumptionWindow {
    /// Creates a new window, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TemporalError> {
        if from > to {
            return Err(TemporalError::InvalidWindow {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    /// Returns the inclusive UTC bounds of the window
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.bounds_in(&Timezone::default())
    }

    /// Returns the inclusive bounds of the window in the given timezone,
    /// expressed as UTC instants
    pub fn bounds_in(&self, tz: &Timezone) -> (DateTime<Utc>, DateTime<Utc>) {
        (tz.start_of_day(self.from), tz.end_of_day(self.to))
    }

    /// Returns true if the UTC instant falls inside the window
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        instant >= start && instant <= end
    }

    /// Number of calendar days covered, counting both bounds
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for ConsumptionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

/// Parses caller-supplied reading timestamp text into a UTC instant
///
/// Accepted forms, tried in order:
/// 1. RFC 3339 (`2024-01-01T08:30:00Z`, `2024-01-01T08:30:00+05:30`)
/// 2. Naive date-time (`2024-01-01T08:30:00` or `2024-01-01 08:30:00`),
///    interpreted as UTC. Stored timestamps are assumed UTC-equivalent;
///    naive input is NOT re-interpreted as local time.
/// 3. Date only (`2024-01-01`), normalized to start-of-day UTC.
pub fn parse_reading_timestamp(text: &str) -> Result<DateTime<Utc>, TemporalError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Timezone::default().start_of_day(date));
    }

    Err(TemporalError::UnparseableTimestamp(text.to_string()))
}
