//! Installed package metadata seam.
//!
//! Lookups fail often and for ordinary reasons (uninstalled packages, hidden
//! profiles, API restrictions), so every primitive returns a `Result` that
//! callers are expected to recover from.

use std::collections::HashMap;
use std::ops::BitOr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single metadata lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Package not found: {0}")]
    NotFound(String),
    #[error("Lookup unsupported: {0}")]
    Unsupported(String),
    #[error("Lookup failed: {0}")]
    Failed(String),
}

/// Application flag bits reported by the package manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppFlags(u32);

impl AppFlags {
    pub const NONE: Self = Self(0);
    /// The package is part of the system image.
    pub const SYSTEM: Self = Self(1);
    /// A system package that received an update.
    pub const UPDATED_SYSTEM_APP: Self = Self(1 << 7);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AppFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Options for an application info lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupFlags {
    /// Also match packages that were uninstalled but kept their data.
    pub include_uninstalled: bool,
}

impl LookupFlags {
    pub const DEFAULT: Self = Self {
        include_uninstalled: false,
    };
    pub const MATCH_UNINSTALLED: Self = Self {
        include_uninstalled: true,
    };
}

/// Application metadata returned by a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    pub package_id: String,
    /// User-facing label, if the package declares one that can be loaded
    pub label: Option<String>,
    pub flags: AppFlags,
}

impl ApplicationInfo {
    /// Whether the OS marks this package as a system component.
    pub fn is_system_component(&self) -> bool {
        self.flags.contains(AppFlags::SYSTEM)
    }
}

/// Package manager primitives used to resolve display metadata.
pub trait PackageCatalog: Send + Sync {
    /// Look up application info for `package_id`.
    fn application_info(
        &self,
        package_id: &str,
        flags: LookupFlags,
    ) -> Result<ApplicationInfo, LookupError>;

    /// Load the label through installed package info.
    fn package_label(&self, package_id: &str) -> Result<String, LookupError>;

    /// Render the launcher icon as encoded image bytes.
    fn render_icon(&self, package_id: &str) -> Result<Vec<u8>, LookupError>;

    /// Whether `LookupFlags::MATCH_UNINSTALLED` is available on this platform level.
    fn supports_uninstalled_lookup(&self) -> bool {
        true
    }
}

impl<T: PackageCatalog + ?Sized> PackageCatalog for Arc<T> {
    fn application_info(
        &self,
        package_id: &str,
        flags: LookupFlags,
    ) -> Result<ApplicationInfo, LookupError> {
        (**self).application_info(package_id, flags)
    }

    fn package_label(&self, package_id: &str) -> Result<String, LookupError> {
        (**self).package_label(package_id)
    }

    fn render_icon(&self, package_id: &str) -> Result<Vec<u8>, LookupError> {
        (**self).render_icon(package_id)
    }

    fn supports_uninstalled_lookup(&self) -> bool {
        (**self).supports_uninstalled_lookup()
    }
}

/// Stored metadata for one package in an [`InMemoryPackageCatalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Label returned by application info lookups
    #[serde(default)]
    pub label: Option<String>,
    /// Label returned by package info lookups, falls back to `label`
    #[serde(default)]
    pub package_label: Option<String>,
    #[serde(default)]
    pub flags: AppFlags,
    /// Uninstalled packages are only visible to `MATCH_UNINSTALLED` lookups
    #[serde(default = "default_installed")]
    pub installed: bool,
    #[serde(
        default,
        serialize_with = "shared::encoding::serialize_icon",
        deserialize_with = "shared::encoding::deserialize_icon"
    )]
    pub icon: Option<Vec<u8>>,
}

fn default_installed() -> bool {
    true
}

impl CatalogEntry {
    /// An installed, user-facing package with `label`.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            installed: true,
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: AppFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn uninstalled(mut self) -> Self {
        self.installed = false;
        self
    }

    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Package catalog backed by a fixed map of entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPackageCatalog {
    entries: HashMap<String, CatalogEntry>,
    /// Simulates a platform level without `MATCH_UNINSTALLED`
    legacy_platform: bool,
}

impl InMemoryPackageCatalog {
    /// Create a catalog from `(package_id, entry)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, CatalogEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            legacy_platform: false,
        }
    }

    /// Disable uninstalled-package lookups.
    pub fn legacy(mut self) -> Self {
        self.legacy_platform = true;
        self
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, package_id: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(package_id.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn installed_entry(&self, package_id: &str) -> Result<&CatalogEntry, LookupError> {
        self.entries
            .get(package_id)
            .filter(|entry| entry.installed)
            .ok_or_else(|| LookupError::NotFound(package_id.to_string()))
    }
}

impl PackageCatalog for InMemoryPackageCatalog {
    fn application_info(
        &self,
        package_id: &str,
        flags: LookupFlags,
    ) -> Result<ApplicationInfo, LookupError> {
        if flags.include_uninstalled && self.legacy_platform {
            return Err(LookupError::Unsupported(
                "MATCH_UNINSTALLED requires a newer platform".to_string(),
            ));
        }

        let entry = if flags.include_uninstalled {
            self.entries
                .get(package_id)
                .ok_or_else(|| LookupError::NotFound(package_id.to_string()))?
        } else {
            self.installed_entry(package_id)?
        };

        Ok(ApplicationInfo {
            package_id: package_id.to_string(),
            label: entry.label.clone(),
            flags: entry.flags,
        })
    }

    fn package_label(&self, package_id: &str) -> Result<String, LookupError> {
        let entry = self.installed_entry(package_id)?;
        entry
            .package_label
            .clone()
            .or_else(|| entry.label.clone())
            .ok_or_else(|| LookupError::Failed(format!("no label for {package_id}")))
    }

    fn render_icon(&self, package_id: &str) -> Result<Vec<u8>, LookupError> {
        let entry = self.installed_entry(package_id)?;
        entry
            .icon
            .clone()
            .ok_or_else(|| LookupError::Failed(format!("no icon for {package_id}")))
    }

    fn supports_uninstalled_lookup(&self) -> bool {
        !self.legacy_platform
    }
}
