//! Display-name resolution for usage entries.
//!
//! Labels are resolved through an ordered chain of strategies. The first
//! strategy that does not miss decides the outcome:
//! 1. Application info lookup, retried with uninstalled packages when supported
//! 2. Installed package info label
//! 3. A name derived from the package identifier

use super::package_catalog::{LookupError, LookupFlags, PackageCatalog};

/// Result of a single strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOutcome {
    Resolved(String),
    /// The package is a system component and must not be shown.
    Excluded,
    /// This strategy could not decide; try the next one.
    Missed(LookupError),
}

/// Final result of running the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Label(String),
    Excluded,
    /// Every strategy missed.
    Unresolved,
}

/// One step of the fallback chain.
pub trait LabelStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn attempt(&self, catalog: &dyn PackageCatalog, package_id: &str) -> LabelOutcome;
}

/// Looks up application info and checks the system flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationInfoStrategy;

impl LabelStrategy for ApplicationInfoStrategy {
    fn name(&self) -> &'static str {
        "application_info"
    }

    fn attempt(&self, catalog: &dyn PackageCatalog, package_id: &str) -> LabelOutcome {
        let info = match catalog.application_info(package_id, LookupFlags::DEFAULT) {
            Ok(info) => info,
            Err(_) if catalog.supports_uninstalled_lookup() => {
                match catalog.application_info(package_id, LookupFlags::MATCH_UNINSTALLED) {
                    Ok(info) => info,
                    Err(e) => return LabelOutcome::Missed(e),
                }
            }
            Err(e) => return LabelOutcome::Missed(e),
        };

        if info.is_system_component() {
            return LabelOutcome::Excluded;
        }

        match info.label {
            Some(label) => LabelOutcome::Resolved(label),
            None => LabelOutcome::Missed(LookupError::Failed(format!(
                "application info for {package_id} has no label"
            ))),
        }
    }
}

/// Loads the label through installed package info.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageInfoStrategy;

impl LabelStrategy for PackageInfoStrategy {
    fn name(&self) -> &'static str {
        "package_info"
    }

    fn attempt(&self, catalog: &dyn PackageCatalog, package_id: &str) -> LabelOutcome {
        match catalog.package_label(package_id) {
            Ok(label) => LabelOutcome::Resolved(label),
            Err(e) => LabelOutcome::Missed(e),
        }
    }
}

/// Derives a label from the package identifier. Never misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedNameStrategy;

impl LabelStrategy for DerivedNameStrategy {
    fn name(&self) -> &'static str {
        "derived_name"
    }

    fn attempt(&self, _catalog: &dyn PackageCatalog, package_id: &str) -> LabelOutcome {
        LabelOutcome::Resolved(derive_label(package_id))
    }
}

/// Capitalized last dot-separated segment of `package_id`.
///
/// `com.weird.App` gives `App`, `com.example.maps` gives `Maps`. An empty
/// last segment (e.g. `com.example.`) gives the raw identifier. Only a
/// single-char uppercase mapping is applied, so `ß` stays `ß`.
pub fn derive_label(package_id: &str) -> String {
    let segment = package_id.rsplit('.').next().unwrap_or_default();
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let mut upper = first.to_uppercase();
            let first = match (upper.next(), upper.next()) {
                (Some(single), None) => single,
                _ => first,
            };
            std::iter::once(first).chain(chars).collect()
        }
        None => package_id.to_string(),
    }
}

/// Ordered fallback chain of label strategies.
pub struct LabelResolver {
    strategies: Vec<Box<dyn LabelStrategy>>,
}

impl LabelResolver {
    /// Build a resolver from an explicit strategy order.
    pub fn new(strategies: Vec<Box<dyn LabelStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy names in attempt order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain for `package_id`, stopping at the first non-miss.
    pub fn resolve(&self, catalog: &dyn PackageCatalog, package_id: &str) -> Resolution {
        for strategy in &self.strategies {
            match strategy.attempt(catalog, package_id) {
                LabelOutcome::Resolved(label) => return Resolution::Label(label),
                LabelOutcome::Excluded => return Resolution::Excluded,
                LabelOutcome::Missed(e) => {
                    tracing::debug!(
                        package_id = %package_id,
                        strategy = strategy.name(),
                        error = %e,
                        "Label strategy missed"
                    );
                }
            }
        }
        Resolution::Unresolved
    }
}

impl Default for LabelResolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ApplicationInfoStrategy),
            Box::new(PackageInfoStrategy),
            Box::new(DerivedNameStrategy),
        ])
    }
}

impl std::fmt::Debug for LabelResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelResolver")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
