//! Calendar-day bucketing and query window arithmetic.
//!
//! Day keys and window boundaries are computed on the local wall clock of a
//! caller-supplied time zone, so a "30 day" window spans 30 calendar days even
//! when a DST transition makes one of them 23 or 25 hours long.

use chrono::{DateTime, Days, Duration, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of a day key, e.g. `2024-03-09`.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Error type for window construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("Window start {start} is after window end {end}")]
    Inverted { start: i64, end: i64 },
    #[error("Window boundary is outside the representable range")]
    OutOfRange,
}

/// Returns the calendar-day key of an epoch-millisecond instant in `tz`.
///
/// Returns `None` when the instant cannot be represented.
pub fn day_key<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<String> {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive().format(DAY_KEY_FORMAT).to_string())
}

/// Steps back `days` calendar days on the local wall clock of `reference`.
///
/// A wall-clock time that occurs twice resolves to the earlier instant.
/// A wall-clock time skipped by a DST gap rolls forward by the length of the
/// gap: 02:30 inside a 02:00 to 03:00 gap becomes 03:30.
pub fn days_before<Tz: TimeZone>(reference: &DateTime<Tz>, days: u64) -> Option<DateTime<Tz>> {
    let tz = reference.timezone();
    let naive = reference.naive_local().checked_sub_days(Days::new(days))?;

    if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
        return Some(resolved);
    }

    // Offset in force a day earlier is the one from before the gap
    let before_gap = naive
        .checked_sub_days(Days::new(1))
        .and_then(|prior| tz.from_local_datetime(&prior).earliest())
        .map(|prior| prior.offset().fix())
        .unwrap_or_else(|| reference.offset().fix());
    let utc_naive =
        naive.checked_sub_signed(Duration::seconds(i64::from(before_gap.local_minus_utc())))?;
    Some(tz.from_utc_datetime(&utc_naive))
}

/// A closed query window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_millis: i64,
    pub end_millis: i64,
}

impl TimeWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start_millis: i64, end_millis: i64) -> Result<Self, WindowError> {
        if start_millis > end_millis {
            return Err(WindowError::Inverted {
                start: start_millis,
                end: end_millis,
            });
        }
        Ok(Self {
            start_millis,
            end_millis,
        })
    }

    /// Window of fixed `length` ending at `end`.
    pub fn trailing(end: DateTime<Utc>, length: Duration) -> Result<Self, WindowError> {
        let start = end.checked_sub_signed(length).ok_or(WindowError::OutOfRange)?;
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }

    /// Window ending at `end` and starting `days` calendar days earlier.
    pub fn calendar_days<Tz: TimeZone>(end: &DateTime<Tz>, days: u64) -> Result<Self, WindowError> {
        let start = days_before(end, days).ok_or(WindowError::OutOfRange)?;
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }

    /// Whether the span `first..=last` shares at least one instant with the window.
    pub fn overlaps(&self, first_millis: i64, last_millis: i64) -> bool {
        first_millis <= self.end_millis && last_millis >= self.start_millis
    }

    /// Length of the window in milliseconds.
    pub fn len_millis(&self) -> i64 {
        self.end_millis - self.start_millis
    }
}
