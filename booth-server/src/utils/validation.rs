//! Input validation helpers

use crate::utils::AppError;

/// Print request ids (UUID v4 is 36 chars; leave room for hand-made ids)
pub const MAX_ID_LEN: usize = 128;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} bytes, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Unwrap a required optional field, then apply [`validate_required_text`].
pub fn require_text(value: Option<String>, field: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::validation(format!("{field} is required")))?;
    validate_required_text(&value, field, max_len)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("abc", "imageData", 10).is_ok());
        assert!(matches!(
            validate_required_text("  ", "imageData", 10),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_required_text("abcdefghijk", "imageData", 10),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_length_limit_counts_bytes() {
        // 6 chars, 12 bytes
        let err = validate_required_text("éééééé", "imageData", 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: imageData is too long (12 bytes, max 10)"
        );
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("x".into()), "id", 10).unwrap(), "x");
        let err = require_text(None, "id", 10).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: id is required");
    }
}
