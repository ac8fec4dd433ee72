//! Domain models for Screen Timer.

pub mod app_usage;
pub mod usage_interval;

pub use app_usage::{AppSnapshotEntry, DailyUsageSeries, WeeklyUsageMatrix};
pub use usage_interval::{IntervalGranularity, UsageInterval};
