//! Usage aggregation engine.
//!
//! Each operation computes its window from the current wall clock, issues
//! exactly one daily-granularity query to the usage source and folds the
//! returned intervals in process. Nothing is cached between calls and the
//! engine holds no mutable state, so operations may run concurrently from
//! independent threads.
//!
//! The usage-access permission is the caller's responsibility.

use chrono::{Duration, Local, TimeZone};
use shared::calendar::TimeWindow;
use shared::validation::validate_package_id;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::metrics::{record_intervals_received, QueryTimer};
use crate::models::{
    AppSnapshotEntry, DailyUsageSeries, IntervalGranularity, UsageInterval, WeeklyUsageMatrix,
};

use super::clock::{Clock, SystemClock};
use super::label_resolution::LabelResolver;
use super::monthly_series::fold_monthly_series;
use super::package_catalog::PackageCatalog;
use super::recency_snapshot::build_recency_snapshot;
use super::usage_source::UsageSource;
use super::weekly_matrix::fold_weekly_matrix;

/// Lookback of the recency snapshot (10 minutes).
pub const DEFAULT_RECENCY_WINDOW_SECS: i64 = 600;

/// Calendar days covered by the monthly series.
pub const DEFAULT_MONTHLY_LOOKBACK_DAYS: u64 = 30;

/// Calendar days before today covered by the weekly matrix (7 days inclusive).
pub const DEFAULT_WEEKLY_LOOKBACK_DAYS: u64 = 6;

/// Window and rendering policy for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub recency_window: Duration,
    pub monthly_lookback_days: u64,
    pub weekly_lookback_days: u64,
    /// Render launcher icons into recency snapshot entries
    pub render_icons: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            recency_window: Duration::seconds(DEFAULT_RECENCY_WINDOW_SECS),
            monthly_lookback_days: DEFAULT_MONTHLY_LOOKBACK_DAYS,
            weekly_lookback_days: DEFAULT_WEEKLY_LOOKBACK_DAYS,
            render_icons: false,
        }
    }
}

/// Aggregates raw usage intervals into the three presentation shapes.
///
/// Day keys are computed in `Tz`, the local time zone by default.
pub struct UsageEngine<S, P, Tz: TimeZone = Local> {
    source: S,
    catalog: P,
    resolver: LabelResolver,
    clock: Box<dyn Clock>,
    tz: Tz,
    options: EngineOptions,
}

impl<S: UsageSource, P: PackageCatalog> UsageEngine<S, P, Local> {
    /// Create an engine on the system clock and local time zone.
    pub fn new(source: S, catalog: P) -> Self {
        Self {
            source,
            catalog,
            resolver: LabelResolver::default(),
            clock: Box::new(SystemClock),
            tz: Local,
            options: EngineOptions::default(),
        }
    }
}

impl<S: UsageSource, P: PackageCatalog, Tz: TimeZone> UsageEngine<S, P, Tz> {
    /// Compute day keys and calendar windows in `tz` instead.
    pub fn with_time_zone<Z: TimeZone>(self, tz: Z) -> UsageEngine<S, P, Z> {
        UsageEngine {
            source: self.source,
            catalog: self.catalog,
            resolver: self.resolver,
            clock: self.clock,
            tz,
            options: self.options,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: LabelResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Recently active apps, most recently used first.
    ///
    /// Covers the trailing recency window ending now. System components and
    /// entries without a usable label are left out. Metadata failures never
    /// fail the call.
    pub fn recency_snapshot(&self) -> Result<Vec<AppSnapshotEntry>, EngineError> {
        let span = info_span!("recency_snapshot", query_id = %Uuid::new_v4());
        let _guard = span.enter();

        let window = TimeWindow::trailing(self.clock.now(), self.options.recency_window)?;
        let intervals = self.query("recency_snapshot", window)?;
        let received = intervals.len();

        let entries = build_recency_snapshot(
            intervals,
            &self.catalog,
            &self.resolver,
            self.options.render_icons,
        );

        info!(
            intervals = received,
            entries = entries.len(),
            "Recency snapshot built"
        );
        Ok(entries)
    }

    /// Daily foreground time of `package_id` over the monthly lookback.
    ///
    /// Fails with [`EngineError::InvalidArgument`] before any query when
    /// `package_id` is not a usable identifier.
    pub fn monthly_series(&self, package_id: &str) -> Result<DailyUsageSeries, EngineError> {
        validate_package_id(package_id)
            .map_err(|e| EngineError::InvalidArgument(format!("packageName: {e}")))?;

        let span = info_span!(
            "monthly_series",
            query_id = %Uuid::new_v4(),
            package_id = %package_id
        );
        let _guard = span.enter();

        let now = self.clock.now().with_timezone(&self.tz);
        let window = TimeWindow::calendar_days(&now, self.options.monthly_lookback_days)?;
        let intervals = self.query("monthly_series", window)?;

        let series = fold_monthly_series(&intervals, package_id, &self.tz);
        info!(days = series.len(), "Monthly series built");
        Ok(series)
    }

    /// Per-day multiset of per-app foreground totals over the weekly lookback.
    pub fn weekly_matrix(&self) -> Result<WeeklyUsageMatrix, EngineError> {
        let span = info_span!("weekly_matrix", query_id = %Uuid::new_v4());
        let _guard = span.enter();

        let now = self.clock.now().with_timezone(&self.tz);
        let window = TimeWindow::calendar_days(&now, self.options.weekly_lookback_days)?;
        let intervals = self.query("weekly_matrix", window)?;

        let matrix = fold_weekly_matrix(&intervals, &self.tz);
        info!(days = matrix.len(), "Weekly matrix built");
        Ok(matrix)
    }

    fn query(
        &self,
        operation: &'static str,
        window: TimeWindow,
    ) -> Result<Vec<UsageInterval>, EngineError> {
        let timer = QueryTimer::new(operation);
        let result = self.source.query(IntervalGranularity::Daily, window);
        timer.record();

        match result {
            Ok(intervals) => {
                record_intervals_received(operation, intervals.len());
                Ok(intervals)
            }
            Err(e) => {
                warn!(
                    operation,
                    start_millis = window.start_millis,
                    end_millis = window.end_millis,
                    error = %e,
                    "Usage query failed"
                );
                Err(e.into())
            }
        }
    }
}

impl<S, P, Tz: TimeZone> std::fmt::Debug for UsageEngine<S, P, Tz> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageEngine")
            .field("resolver", &self.resolver)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
