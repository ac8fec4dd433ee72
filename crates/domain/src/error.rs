//! Engine error types.

use shared::calendar::WindowError;
use thiserror::Error;

use crate::services::usage_source::UsageSourceError;

/// Failures that abort a single engine operation.
///
/// Metadata and icon lookup failures never surface here; they are recovered
/// inside the recency snapshot by dropping or degrading the affected entry.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A precondition on the caller's arguments was violated. No query was issued.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid query window: {0}")]
    InvalidWindow(#[from] WindowError),

    /// The usage service query itself failed.
    #[error("Usage query failed: {0}")]
    Source(#[from] UsageSourceError),
}

impl EngineError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidWindow(_) => "invalid_window",
            Self::Source(_) => "usage_source",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EngineError::InvalidArgument("packageName".into()).code(),
            "invalid_argument"
        );
        assert_eq!(
            EngineError::from(WindowError::OutOfRange).code(),
            "invalid_window"
        );
        assert_eq!(
            EngineError::from(UsageSourceError::PermissionDenied).code(),
            "usage_source"
        );
    }

    #[test]
    fn test_source_error_message() {
        let err = EngineError::from(UsageSourceError::Unavailable("service gone".into()));
        assert_eq!(
            err.to_string(),
            "Usage query failed: Usage service unavailable: service gone"
        );
    }
}
