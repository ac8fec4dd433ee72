//! Domain services for Screen Timer.
//!
//! Services contain the aggregation logic and the seams to the platform
//! collaborators it depends on.

pub mod access_gate;
pub mod clock;
pub mod label_resolution;
pub mod monthly_series;
pub mod package_catalog;
pub mod recency_snapshot;
pub mod usage_engine;
pub mod usage_source;
pub mod weekly_matrix;

pub use access_gate::{AccessError, AccessMode, StaticAccessGate, UsageAccessGate};
pub use clock::{Clock, FixedClock, SystemClock};
pub use label_resolution::{
    derive_label, ApplicationInfoStrategy, DerivedNameStrategy, LabelOutcome, LabelResolver,
    LabelStrategy, PackageInfoStrategy, Resolution,
};
pub use package_catalog::{
    AppFlags, ApplicationInfo, CatalogEntry, InMemoryPackageCatalog, LookupError, LookupFlags,
    PackageCatalog,
};
pub use usage_engine::{EngineOptions, UsageEngine};
pub use usage_source::{InMemoryUsageSource, UsageSource, UsageSourceError};
