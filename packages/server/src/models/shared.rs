use crate::error::AppError;

/// Validate a required free-text field (trimmed, 1-256 Unicode characters).
pub fn validate_required_text(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be at most 256 characters"
        )));
    }
    Ok(())
}

/// Validate an opaque photo blob (non-empty; size capped by the body limit,
/// not inspected here).
pub fn validate_photo(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}
