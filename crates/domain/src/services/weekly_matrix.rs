//! Per-day, cross-app usage matrix.

use std::collections::BTreeMap;

use chrono::TimeZone;
use shared::calendar::day_key;

use crate::models::{UsageInterval, WeeklyUsageMatrix};

/// Group intervals by calendar day in `tz`, then by package, and keep only
/// the per-package totals for each day.
///
/// Within a day the totals are ordered by package identifier, but that order
/// carries no meaning for callers.
pub fn fold_weekly_matrix<Tz: TimeZone>(intervals: &[UsageInterval], tz: &Tz) -> WeeklyUsageMatrix {
    let mut by_day: BTreeMap<String, BTreeMap<&str, i64>> = BTreeMap::new();

    for interval in intervals {
        let Some(day) = day_key(interval.first_timestamp, tz) else {
            tracing::warn!(
                package_id = %interval.package_id,
                first_timestamp = interval.first_timestamp,
                "Skipping interval with unrepresentable timestamp"
            );
            continue;
        };
        let total = by_day
            .entry(day)
            .or_default()
            .entry(interval.package_id.as_str())
            .or_insert(0);
        *total = total.saturating_add(interval.foreground_duration);
    }

    let days: BTreeMap<String, Vec<i64>> = by_day
        .into_iter()
        .map(|(day, apps)| (day, apps.into_values().collect()))
        .collect();

    WeeklyUsageMatrix::from(days)
}
