//! Aggregated app usage models.
//!
//! These are the three result shapes handed to the presentation layer. Each
//! is built fresh per engine call and is not mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::encoding::{deserialize_icon, serialize_icon};

/// One recently active app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSnapshotEntry {
    /// Package identifier (e.g., com.example.app)
    #[serde(rename = "packageName")]
    pub package_id: String,
    /// Resolved display name, never blank
    #[serde(rename = "appName")]
    pub display_name: String,
    /// Foreground time in milliseconds from the single matching interval
    #[serde(rename = "usageTime")]
    pub total_foreground_time: i64,
    /// Last used timestamp in epoch milliseconds
    #[serde(rename = "lastTimeUsed")]
    pub last_used_timestamp: i64,
    /// Rendered icon, if requested and available
    #[serde(
        rename = "icon",
        default,
        serialize_with = "serialize_icon",
        deserialize_with = "deserialize_icon"
    )]
    pub icon_payload: Option<Vec<u8>>,
}

/// Per-day foreground time for a single app, keyed by `YYYY-MM-DD`.
///
/// Only days with at least one matching interval are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyUsageSeries {
    days: BTreeMap<String, i64>,
}

impl DailyUsageSeries {
    /// Foreground milliseconds recorded for `day_key`.
    pub fn get(&self, day_key: &str) -> Option<i64> {
        self.days.get(day_key).copied()
    }

    /// Number of days with usage.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate days in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.days.iter().map(|(day, total)| (day.as_str(), *total))
    }

    /// Sum across all days.
    pub fn total(&self) -> i64 {
        self.days.values().fold(0i64, |acc, v| acc.saturating_add(*v))
    }
}

impl From<BTreeMap<String, i64>> for DailyUsageSeries {
    fn from(days: BTreeMap<String, i64>) -> Self {
        Self { days }
    }
}

/// Per-day multiset of per-app totals, keyed by `YYYY-MM-DD`.
///
/// App identity is discarded. Callers must not rely on the position of a
/// value within a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyUsageMatrix {
    days: BTreeMap<String, Vec<i64>>,
}

impl WeeklyUsageMatrix {
    /// Per-app totals recorded for `day_key`.
    pub fn get(&self, day_key: &str) -> Option<&[i64]> {
        self.days.get(day_key).map(Vec::as_slice)
    }

    /// Number of days with usage.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate days in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.days
            .iter()
            .map(|(day, totals)| (day.as_str(), totals.as_slice()))
    }

    /// Sum of every value across every day.
    pub fn total(&self) -> i64 {
        self.days
            .values()
            .flatten()
            .fold(0i64, |acc, v| acc.saturating_add(*v))
    }
}

impl From<BTreeMap<String, Vec<i64>>> for WeeklyUsageMatrix {
    fn from(days: BTreeMap<String, Vec<i64>>) -> Self {
        Self { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_entry_serializes_presentation_fields() {
        let entry = AppSnapshotEntry {
            package_id: "com.example.app".to_string(),
            display_name: "Example".to_string(),
            total_foreground_time: 60_000,
            last_used_timestamp: 1_700_000_000_000,
            icon_payload: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "packageName": "com.example.app",
                "appName": "Example",
                "usageTime": 60_000,
                "lastTimeUsed": 1_700_000_000_000i64,
                "icon": null
            })
        );
    }

    #[test]
    fn test_snapshot_entry_icon_is_base64() {
        let entry = AppSnapshotEntry {
            package_id: "com.example.app".to_string(),
            display_name: "Example".to_string(),
            total_foreground_time: 0,
            last_used_timestamp: 0,
            icon_payload: Some(b"png".to_vec()),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["icon"], json!("cG5n"));
    }

    #[test]
    fn test_daily_series_accessors() {
        let mut days = BTreeMap::new();
        days.insert("2024-03-02".to_string(), 30_000);
        days.insert("2024-03-01".to_string(), 60_000);
        let series = DailyUsageSeries::from(days);

        assert_eq!(series.len(), 2);
        assert_eq!(series.get("2024-03-01"), Some(60_000));
        assert_eq!(series.get("2024-03-03"), None);
        assert_eq!(series.total(), 90_000);
        let keys: Vec<&str> = series.iter().map(|(day, _)| day).collect();
        assert_eq!(keys, vec!["2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn test_daily_series_serializes_as_map() {
        let mut days = BTreeMap::new();
        days.insert("2024-03-01".to_string(), 90_000);
        let value = serde_json::to_value(DailyUsageSeries::from(days)).unwrap();
        assert_eq!(value, json!({ "2024-03-01": 90_000 }));
    }

    #[test]
    fn test_weekly_matrix_total() {
        let mut days = BTreeMap::new();
        days.insert("2024-03-01".to_string(), vec![10, 20]);
        days.insert("2024-03-02".to_string(), vec![5]);
        let matrix = WeeklyUsageMatrix::from(days);

        assert_eq!(matrix.total(), 35);
        assert_eq!(matrix.get("2024-03-01"), Some(&[10, 20][..]));
        assert!(!matrix.is_empty());
    }

    #[test]
    fn test_empty_results() {
        assert!(DailyUsageSeries::default().is_empty());
        assert_eq!(WeeklyUsageMatrix::default().total(), 0);
    }
}
