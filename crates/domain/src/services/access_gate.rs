//! Usage-access permission seam.
//!
//! Callers consult the gate before invoking the engine. The engine itself
//! never checks it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mode reported by the platform for the usage-stats operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    Allowed,
    Ignored,
    Errored,
    /// Never decided by the user; treated as not granted.
    #[default]
    Default,
}

impl AccessMode {
    /// Only an explicit allow grants access.
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => write!(f, "allowed"),
            Self::Ignored => write!(f, "ignored"),
            Self::Errored => write!(f, "errored"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Failure to open the usage-access settings screen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Usage access settings are unavailable: {0}")]
    SettingsUnavailable(String),
}

/// Reports and requests the usage-access permission.
pub trait UsageAccessGate: Send + Sync {
    /// Current permission mode.
    fn mode(&self) -> AccessMode;

    /// Whether usage queries are permitted.
    fn is_granted(&self) -> bool {
        self.mode().is_allowed()
    }

    /// Send the user to the settings screen where access can be granted.
    fn open_access_settings(&self) -> Result<(), AccessError>;
}

/// Gate with a fixed mode, for hosts without a live permission service.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessGate {
    mode: AccessMode,
    settings_available: bool,
}

impl StaticAccessGate {
    pub fn new(mode: AccessMode) -> Self {
        Self {
            mode,
            settings_available: true,
        }
    }

    pub fn granted() -> Self {
        Self::new(AccessMode::Allowed)
    }

    /// Gate whose settings launcher always fails.
    pub fn without_settings(mut self) -> Self {
        self.settings_available = false;
        self
    }
}

impl UsageAccessGate for StaticAccessGate {
    fn mode(&self) -> AccessMode {
        self.mode
    }

    fn open_access_settings(&self) -> Result<(), AccessError> {
        if !self.settings_available {
            return Err(AccessError::SettingsUnavailable(
                "no settings launcher on this host".to_string(),
            ));
        }
        tracing::info!(mode = %self.mode, "Usage access settings requested");
        Ok(())
    }
}
