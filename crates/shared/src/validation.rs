//! Common validation utilities.

use validator::ValidationError;

/// Maximum accepted package identifier length in bytes.
const MAX_PACKAGE_ID_LENGTH: usize = 255;

/// Validates that a package identifier is usable as a lookup key.
/// - Must not be empty or blank
/// - Must not contain whitespace or control characters
/// - Must not exceed 255 bytes
pub fn validate_package_id(package_id: &str) -> Result<(), ValidationError> {
    if package_id.trim().is_empty() {
        let mut err = ValidationError::new("package_id_blank");
        err.message = Some("Package identifier is required".into());
        return Err(err);
    }

    if package_id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        let mut err = ValidationError::new("package_id_format");
        err.message = Some("Package identifier cannot contain whitespace".into());
        return Err(err);
    }

    if package_id.len() > MAX_PACKAGE_ID_LENGTH {
        let mut err = ValidationError::new("package_id_length");
        err.message = Some("Package identifier cannot exceed 255 bytes".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a foreground duration is non-negative.
pub fn validate_duration_millis(duration_millis: i64) -> Result<(), ValidationError> {
    if duration_millis >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("duration_range");
        err.message = Some("Foreground duration must be non-negative".into());
        Err(err)
    }
}

/// Validates that an interval's first timestamp does not follow its last-used timestamp.
pub fn validate_interval_order(first_millis: i64, last_used_millis: i64) -> Result<(), ValidationError> {
    if first_millis <= last_used_millis {
        Ok(())
    } else {
        let mut err = ValidationError::new("interval_order");
        err.message = Some("First timestamp cannot be after last used timestamp".into());
        Err(err)
    }
}
