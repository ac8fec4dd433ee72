//! Platform usage service seam.
//!
//! The engine issues exactly one query per operation and treats the source as
//! a read-only oracle for the requested window.

use std::sync::{Arc, Mutex};

use shared::calendar::TimeWindow;
use thiserror::Error;

use crate::models::{IntervalGranularity, UsageInterval};

/// Failure of the usage query itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageSourceError {
    #[error("Usage access denied")]
    PermissionDenied,
    #[error("Usage service unavailable: {0}")]
    Unavailable(String),
}

/// Source of raw per-app usage intervals.
///
/// An absent platform service is an empty result, not an error.
pub trait UsageSource: Send + Sync {
    /// Return every interval bucket overlapping `window`, in no particular order.
    fn query(
        &self,
        granularity: IntervalGranularity,
        window: TimeWindow,
    ) -> Result<Vec<UsageInterval>, UsageSourceError>;
}

impl<T: UsageSource + ?Sized> UsageSource for Arc<T> {
    fn query(
        &self,
        granularity: IntervalGranularity,
        window: TimeWindow,
    ) -> Result<Vec<UsageInterval>, UsageSourceError> {
        (**self).query(granularity, window)
    }
}

/// Usage source backed by a fixed set of intervals.
///
/// Used for recorded usage dumps and for tests. Returned intervals keep their
/// stored order.
#[derive(Debug, Default)]
pub struct InMemoryUsageSource {
    intervals: Vec<UsageInterval>,
    failure: Option<UsageSourceError>,
    queries: Mutex<Vec<(IntervalGranularity, TimeWindow)>>,
}

impl InMemoryUsageSource {
    /// Create a source serving `intervals`.
    pub fn new(intervals: Vec<UsageInterval>) -> Self {
        Self {
            intervals,
            ..Default::default()
        }
    }

    /// Create a source whose every query fails with `error`.
    pub fn failing(error: UsageSourceError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    /// Windows queried so far, oldest first.
    pub fn queries(&self) -> Vec<(IntervalGranularity, TimeWindow)> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

impl UsageSource for InMemoryUsageSource {
    fn query(
        &self,
        granularity: IntervalGranularity,
        window: TimeWindow,
    ) -> Result<Vec<UsageInterval>, UsageSourceError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((granularity, window));
        }

        if let Some(error) = &self.failure {
            tracing::warn!(
                granularity = %granularity,
                error = %error,
                "In-memory usage source simulating failure"
            );
            return Err(error.clone());
        }

        Ok(self
            .intervals
            .iter()
            .filter(|interval| {
                window.overlaps(interval.first_timestamp, interval.last_used_timestamp)
            })
            .cloned()
            .collect())
    }
}
