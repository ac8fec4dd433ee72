//! Raw usage records as reported by the platform usage service.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use shared::validation::{validate_duration_millis, validate_interval_order, validate_package_id};

/// Bucket size requested from the platform usage service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalGranularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Let the platform pick the best fitting bucket.
    Best,
}

impl std::fmt::Display for IntervalGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
            Self::Best => write!(f, "best"),
        }
    }
}

/// Foreground time for one app within one platform bucket.
///
/// All timestamps are epoch milliseconds and durations are milliseconds.
/// Buckets for the same package repeat across days; a single record never
/// spans more than one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_timestamps"))]
pub struct UsageInterval {
    #[validate(custom(function = "validate_package_id"))]
    pub package_id: String,
    pub first_timestamp: i64,
    pub last_used_timestamp: i64,
    #[validate(custom(function = "validate_duration_millis"))]
    pub foreground_duration: i64,
}

fn validate_timestamps(interval: &UsageInterval) -> Result<(), ValidationError> {
    validate_interval_order(interval.first_timestamp, interval.last_used_timestamp)
}

impl UsageInterval {
    /// Create a new usage interval.
    pub fn new(
        package_id: impl Into<String>,
        first_timestamp: i64,
        last_used_timestamp: i64,
        foreground_duration: i64,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            first_timestamp,
            last_used_timestamp,
            foreground_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_deserializes_camel_case() {
        let json = r#"{
            "packageId": "com.example.app",
            "firstTimestamp": 1000,
            "lastUsedTimestamp": 2000,
            "foregroundDuration": 500
        }"#;
        let interval: UsageInterval = serde_json::from_str(json).unwrap();
        assert_eq!(interval, UsageInterval::new("com.example.app", 1000, 2000, 500));
    }

    #[test]
    fn test_interval_validation() {
        assert!(UsageInterval::new("com.example.app", 1000, 2000, 500)
            .validate()
            .is_ok());
        assert!(UsageInterval::new("", 1000, 2000, 500).validate().is_err());
        assert!(UsageInterval::new("com.example.app", 1000, 2000, -1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_interval_validation_rejects_inverted_timestamps() {
        assert!(UsageInterval::new("com.example.app", 3000, 2000, 0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_granularity_display() {
        assert_eq!(IntervalGranularity::Daily.to_string(), "daily");
        assert_eq!(IntervalGranularity::default(), IntervalGranularity::Daily);
    }
}
