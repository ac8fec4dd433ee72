//! Per-day usage series for a single app.

use std::collections::BTreeMap;

use chrono::TimeZone;
use shared::calendar::day_key;

use crate::models::{DailyUsageSeries, UsageInterval};

/// Sum `package_id`'s foreground time per calendar day in `tz`.
///
/// Day keys come from `first_timestamp`, the start of the platform bucket.
/// The result depends only on the multiset of intervals, not their order.
/// System components are not filtered here.
pub fn fold_monthly_series<Tz: TimeZone>(
    intervals: &[UsageInterval],
    package_id: &str,
    tz: &Tz,
) -> DailyUsageSeries {
    let mut days: BTreeMap<String, i64> = BTreeMap::new();

    for interval in intervals.iter().filter(|i| i.package_id == package_id) {
        let Some(day) = day_key(interval.first_timestamp, tz) else {
            tracing::warn!(
                package_id = %interval.package_id,
                first_timestamp = interval.first_timestamp,
                "Skipping interval with unrepresentable timestamp"
            );
            continue;
        };
        let total = days.entry(day).or_insert(0);
        *total = total.saturating_add(interval.foreground_duration);
    }

    DailyUsageSeries::from(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use fake::Fake;
    use rand::seq::SliceRandom;

    fn at(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_sums_matching_package_per_day() {
        let d1 = at(2024, 3, 1, 9);
        let intervals = vec![
            UsageInterval::new("com.a.b", d1, d1 + 1_000, 60_000),
            UsageInterval::new("com.a.b", d1, d1 + 2_000, 30_000),
            UsageInterval::new("com.x", d1, d1 + 3_000, 10_000),
        ];

        let series = fold_monthly_series(&intervals, "com.a.b", &Utc);
        assert_eq!(series.len(), 1);
        assert_eq!(series.get("2024-03-01"), Some(90_000));
    }

    #[test]
    fn test_keys_by_first_timestamp() {
        // Bucket starts late on the 1st and was last used on the 2nd
        let first = at(2024, 3, 1, 23);
        let last = at(2024, 3, 2, 1);
        let intervals = vec![UsageInterval::new("com.a", first, last, 5_000)];

        let series = fold_monthly_series(&intervals, "com.a", &Utc);
        assert_eq!(series.get("2024-03-01"), Some(5_000));
        assert_eq!(series.get("2024-03-02"), None);
    }

    #[test]
    fn test_day_keys_follow_time_zone() {
        let first = at(2024, 3, 1, 23);
        let intervals = vec![UsageInterval::new("com.a", first, first, 5_000)];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        let series = fold_monthly_series(&intervals, "com.a", &tokyo);
        assert_eq!(series.get("2024-03-02"), Some(5_000));
    }

    #[test]
    fn test_no_zero_filling() {
        let intervals = vec![
            UsageInterval::new("com.a", at(2024, 3, 1, 8), at(2024, 3, 1, 9), 1),
            UsageInterval::new("com.a", at(2024, 3, 4, 8), at(2024, 3, 4, 9), 1),
        ];
        let series = fold_monthly_series(&intervals, "com.a", &Utc);
        let keys: Vec<&str> = series.iter().map(|(day, _)| day).collect();
        assert_eq!(keys, vec!["2024-03-01", "2024-03-04"]);
    }

    #[test]
    fn test_zero_durations_still_create_keys() {
        let d1 = at(2024, 3, 1, 8);
        let intervals = vec![UsageInterval::new("com.a", d1, d1, 0)];
        let series = fold_monthly_series(&intervals, "com.a", &Utc);
        assert_eq!(series.get("2024-03-01"), Some(0));
    }

    #[test]
    fn test_no_matching_package() {
        let d1 = at(2024, 3, 1, 8);
        let intervals = vec![UsageInterval::new("com.x", d1, d1, 10)];
        assert!(fold_monthly_series(&intervals, "com.a", &Utc).is_empty());
    }

    #[test]
    fn test_order_independent() {
        let packages = ["com.a", "com.b", "com.c"];
        let mut rng = rand::thread_rng();
        let mut intervals: Vec<UsageInterval> = (0..200)
            .map(|i| {
                let day = (i % 28) as u32 + 1;
                let first = at(2024, 2, day, (i % 24) as u32);
                let package = packages.choose(&mut rng).copied().unwrap_or("com.a");
                UsageInterval::new(package, first, first, (0..3_600_000i64).fake::<i64>())
            })
            .collect();

        let expected = fold_monthly_series(&intervals, "com.a", &Utc);
        let expected_total: i64 = intervals
            .iter()
            .filter(|i| i.package_id == "com.a")
            .map(|i| i.foreground_duration)
            .sum();
        assert_eq!(expected.total(), expected_total);

        for _ in 0..5 {
            intervals.shuffle(&mut rng);
            assert_eq!(fold_monthly_series(&intervals, "com.a", &Utc), expected);
        }
    }
}
