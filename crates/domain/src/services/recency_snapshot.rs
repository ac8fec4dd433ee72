//! Recency snapshot construction.
//!
//! Turns the intervals of a short lookback window into a list of recently
//! active apps, most recent first. Entries are only ever dropped, never
//! merged: a package reported in two buckets appears twice.

use crate::metrics::record_snapshot_drop;
use crate::models::{AppSnapshotEntry, UsageInterval};

use super::label_resolution::{LabelResolver, Resolution};
use super::package_catalog::PackageCatalog;

/// Why an interval produced no snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    SystemComponent,
    BlankLabel,
    Unresolved,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemComponent => "system_component",
            Self::BlankLabel => "blank_label",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Build the snapshot from raw intervals.
///
/// Intervals are stably sorted by descending `last_used_timestamp`, so equal
/// timestamps keep their input order. Icons are rendered only when
/// `render_icons` is set; a failed render leaves the icon empty.
pub fn build_recency_snapshot(
    mut intervals: Vec<UsageInterval>,
    catalog: &dyn PackageCatalog,
    resolver: &LabelResolver,
    render_icons: bool,
) -> Vec<AppSnapshotEntry> {
    intervals.sort_by(|a, b| b.last_used_timestamp.cmp(&a.last_used_timestamp));

    let mut entries = Vec::with_capacity(intervals.len());
    for interval in intervals {
        let display_name = match resolver.resolve(catalog, &interval.package_id) {
            Resolution::Label(label) => label,
            Resolution::Excluded => {
                note_drop(&interval, DropReason::SystemComponent);
                continue;
            }
            Resolution::Unresolved => {
                note_drop(&interval, DropReason::Unresolved);
                continue;
            }
        };

        if display_name.trim().is_empty() {
            note_drop(&interval, DropReason::BlankLabel);
            continue;
        }

        let icon_payload = if render_icons {
            render_icon(catalog, &interval.package_id)
        } else {
            None
        };

        entries.push(AppSnapshotEntry {
            package_id: interval.package_id,
            display_name,
            total_foreground_time: interval.foreground_duration,
            last_used_timestamp: interval.last_used_timestamp,
            icon_payload,
        });
    }

    entries
}

fn render_icon(catalog: &dyn PackageCatalog, package_id: &str) -> Option<Vec<u8>> {
    match catalog.render_icon(package_id) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!(package_id = %package_id, error = %e, "Icon rendering failed");
            None
        }
    }
}

fn note_drop(interval: &UsageInterval, reason: DropReason) {
    tracing::debug!(
        package_id = %interval.package_id,
        reason = reason.as_str(),
        "Dropping snapshot entry"
    );
    record_snapshot_drop(reason.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::label_resolution::{ApplicationInfoStrategy, PackageInfoStrategy};
    use crate::services::package_catalog::{AppFlags, CatalogEntry, InMemoryPackageCatalog};

    fn catalog() -> InMemoryPackageCatalog {
        InMemoryPackageCatalog::new([
            ("com.a".to_string(), CatalogEntry::labeled("Alpha")),
            ("com.b".to_string(), CatalogEntry::labeled("Beta")),
            ("com.c".to_string(), CatalogEntry::labeled("Gamma")),
            (
                "com.android.systemui".to_string(),
                CatalogEntry::labeled("System UI").with_flags(AppFlags::SYSTEM),
            ),
            ("com.blank".to_string(), CatalogEntry::labeled("   ")),
            (
                "com.icon".to_string(),
                CatalogEntry::labeled("Iconic").with_icon(vec![7, 7]),
            ),
        ])
    }

    fn build(intervals: Vec<UsageInterval>, render_icons: bool) -> Vec<AppSnapshotEntry> {
        build_recency_snapshot(intervals, &catalog(), &LabelResolver::default(), render_icons)
    }

    fn ids(entries: &[AppSnapshotEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.package_id.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_last_used_descending() {
        let entries = build(
            vec![
                UsageInterval::new("com.a", 0, 10, 1),
                UsageInterval::new("com.b", 0, 30, 1),
                UsageInterval::new("com.c", 0, 20, 1),
            ],
            false,
        );
        assert_eq!(ids(&entries), vec!["com.b", "com.c", "com.a"]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let entries = build(
            vec![
                UsageInterval::new("com.a", 0, 100, 1),
                UsageInterval::new("com.b", 0, 50, 1),
                UsageInterval::new("com.c", 0, 100, 1),
            ],
            false,
        );
        assert_eq!(ids(&entries), vec!["com.a", "com.c", "com.b"]);
    }

    #[test]
    fn test_system_components_are_excluded() {
        let entries = build(
            vec![
                UsageInterval::new("com.android.systemui", 0, 100, 1),
                UsageInterval::new("com.a", 0, 90, 1),
            ],
            false,
        );
        assert_eq!(ids(&entries), vec!["com.a"]);
    }

    #[test]
    fn test_blank_labels_are_dropped() {
        let entries = build(vec![UsageInterval::new("com.blank", 0, 100, 1)], false);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unknown_package_uses_derived_label() {
        let entries = build(vec![UsageInterval::new("org.unknown.reader", 0, 1, 1)], false);
        assert_eq!(entries[0].display_name, "Reader");
    }

    #[test]
    fn test_unresolved_entries_are_dropped() {
        let resolver = LabelResolver::new(vec![
            Box::new(ApplicationInfoStrategy),
            Box::new(PackageInfoStrategy),
        ]);
        let entries = build_recency_snapshot(
            vec![
                UsageInterval::new("org.unknown.reader", 0, 2, 1),
                UsageInterval::new("com.a", 0, 1, 1),
            ],
            &catalog(),
            &resolver,
            false,
        );
        assert_eq!(ids(&entries), vec!["com.a"]);
    }

    #[test]
    fn test_duration_comes_from_single_interval() {
        let entries = build(
            vec![
                UsageInterval::new("com.a", 0, 100, 60_000),
                UsageInterval::new("com.a", 0, 90, 30_000),
            ],
            false,
        );
        let durations: Vec<i64> = entries.iter().map(|e| e.total_foreground_time).collect();
        assert_eq!(durations, vec![60_000, 30_000]);
    }

    #[test]
    fn test_repeated_package_is_not_deduplicated() {
        // Documented quirk: a window spanning two day buckets reports the
        // package twice and both entries pass through.
        let entries = build(
            vec![
                UsageInterval::new("com.a", 0, 100, 1),
                UsageInterval::new("com.a", 101, 200, 1),
            ],
            false,
        );
        assert_eq!(ids(&entries), vec!["com.a", "com.a"]);
    }

    #[test]
    fn test_icons_only_when_requested() {
        let intervals = vec![UsageInterval::new("com.icon", 0, 1, 1)];
        assert_eq!(build(intervals.clone(), false)[0].icon_payload, None);
        assert_eq!(build(intervals, true)[0].icon_payload, Some(vec![7, 7]));
    }

    #[test]
    fn test_icon_failure_keeps_entry() {
        let entries = build(vec![UsageInterval::new("com.a", 0, 1, 1)], true);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].icon_payload.is_none());
    }

    #[test]
    fn test_never_grows_and_never_contains_system_components() {
        let intervals = vec![
            UsageInterval::new("com.a", 0, 5, 1),
            UsageInterval::new("com.android.systemui", 0, 4, 1),
            UsageInterval::new("com.blank", 0, 3, 1),
            UsageInterval::new("com.b", 0, 2, 1),
            UsageInterval::new("com.android.systemui", 0, 1, 1),
        ];
        let input_len = intervals.len();
        let entries = build(intervals, false);
        assert!(entries.len() <= input_len);
        assert!(entries
            .iter()
            .all(|e| e.package_id != "com.android.systemui"));
    }

    #[test]
    fn test_empty_input() {
        assert!(build(Vec::new(), true).is_empty());
    }
}
