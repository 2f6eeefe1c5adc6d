//! Shared threshold validation helpers.
//!
//! Provides reusable range-checking functions used by the record model and
//! alert configuration.

use crate::error::CoreError;

/// Validate that a value is a finite real number (not NaN or infinite).
///
/// Returns a `CoreError::Validation` naming the field otherwise.
pub fn validate_finite(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a value falls within `[min, max]`.
pub fn validate_range(value: f64, min: f64, max: f64, name: &str) -> Result<(), CoreError> {
    validate_finite(value, name)?;
    if !(min..=max).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}
