use std::path::PathBuf;

use domain::services::{AccessError, AccessMode};
use domain::EngineError;
use thiserror::Error;

use crate::config::ConfigValidationError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture {path}: {details}")]
    Fixture { path: PathBuf, details: String },

    #[error("Usage access not granted (mode: {0})")]
    AccessDenied(AccessMode),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl ReportError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Io { .. } => "io",
            Self::Fixture { .. } => "fixture",
            Self::AccessDenied(_) => "access_denied",
            Self::Access(_) => "access_settings",
            Self::Engine(e) => e.code(),
            Self::Serialization(_) => "serialization",
            Self::NotImplemented(_) => "not_implemented",
        }
    }
}
