//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by
//! the API handlers before anything reaches the engine.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer and restaurant names
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_required_text() {
        assert!(validate_required_text("  ", "customer_name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Alice", "customer_name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn rejects_overlong_text() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "customer_name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "phone", MAX_SHORT_TEXT_LEN).is_err());
        assert!(validate_optional_text(&None, "phone", MAX_SHORT_TEXT_LEN).is_ok());
    }
}
