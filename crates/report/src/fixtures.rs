//! JSON-file-backed collaborators.
//!
//! A usage dump is a JSON array of intervals; a catalog is a JSON object
//! mapping package ids to catalog entries.

use std::collections::HashMap;
use std::path::Path;

use domain::models::UsageInterval;
use domain::services::{CatalogEntry, InMemoryPackageCatalog, InMemoryUsageSource};
use serde::de::DeserializeOwned;
use tracing::info;
use validator::Validate;

use crate::error::ReportError;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| ReportError::Fixture {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

/// Load a usage dump, rejecting records that break interval invariants.
pub fn load_usage_source(path: impl AsRef<Path>) -> Result<InMemoryUsageSource, ReportError> {
    let path = path.as_ref();
    let intervals: Vec<UsageInterval> = read_json(path)?;

    for (index, interval) in intervals.iter().enumerate() {
        interval.validate().map_err(|e| ReportError::Fixture {
            path: path.to_path_buf(),
            details: format!("interval {index}: {e}"),
        })?;
    }

    info!(path = %path.display(), intervals = intervals.len(), "Loaded usage dump");
    Ok(InMemoryUsageSource::new(intervals))
}

/// Load a package catalog.
pub fn load_package_catalog(
    path: impl AsRef<Path>,
    legacy_platform: bool,
) -> Result<InMemoryPackageCatalog, ReportError> {
    let path = path.as_ref();
    let entries: HashMap<String, CatalogEntry> = read_json(path)?;

    info!(path = %path.display(), packages = entries.len(), "Loaded package catalog");
    let catalog = InMemoryPackageCatalog::new(entries);
    Ok(if legacy_platform {
        catalog.legacy()
    } else {
        catalog
    })
}
