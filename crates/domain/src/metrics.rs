//! Engine metrics collection.
//!
//! Provides functions for recording usage query metrics. Nothing is exported
//! unless the host installs a `metrics` recorder.

use metrics::{counter, histogram};
use std::time::Instant;

/// Record usage service query duration.
pub fn record_query_duration(operation: &'static str, duration_secs: f64) {
    histogram!(
        "usage_query_duration_seconds",
        "operation" => operation
    )
    .record(duration_secs);
}

/// Record how many raw intervals a query returned.
pub fn record_intervals_received(operation: &'static str, count: usize) {
    counter!(
        "usage_intervals_received_total",
        "operation" => operation
    )
    .increment(count as u64);
}

/// Record a recency snapshot entry dropped during resolution.
pub fn record_snapshot_drop(reason: &'static str) {
    counter!(
        "usage_snapshot_entries_dropped_total",
        "reason" => reason
    )
    .increment(1);
}

/// A helper to time usage service queries and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("weekly_matrix");
/// let intervals = source.query(IntervalGranularity::Daily, window);
/// timer.record();
/// ```
pub struct QueryTimer {
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    /// Create a new timer for the given operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed time and consume the timer.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(self.operation, duration);
    }
}
