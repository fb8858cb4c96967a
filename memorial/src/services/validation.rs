//! Form field checks shared by the public submission paths

use crate::config::MAX_EMAIL_LENGTH;
use crate::error::{AppError, Result};

/// Trim a required text field and enforce its length limit
pub fn required(field: &str, value: &str, max_chars: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }

    let len = trimmed.chars().count();
    if len > max_chars {
        return Err(AppError::Validation(format!(
            "{} is too long ({} > {} characters)",
            field, len, max_chars
        )));
    }

    Ok(trimmed.to_string())
}

/// Trim an optional field; blank input becomes `None`
pub fn optional(field: &str, value: Option<&str>, max_chars: usize) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => required(field, text, max_chars).map(Some),
    }
}

/// Minimal address check; the relay does the real validation
pub fn email(value: &str) -> Result<String> {
    let trimmed = required("Email", value, MAX_EMAIL_LENGTH)?;
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed),
        _ => Err(AppError::Validation(format!(
            "Invalid email address: {}",
            trimmed
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("Name", "  Ayşe  ", 10).unwrap(), "Ayşe");
        assert!(matches!(
            required("Name", "   ", 10),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        // 5 chars, 10 bytes
        assert!(required("Name", "çğıöü", 5).is_ok());
        assert!(required("Name", "çğıöüş", 5).is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("Image", Some("  "), 10).unwrap(), None);
        assert_eq!(optional("Image", None, 10).unwrap(), None);
        assert_eq!(
            optional("Image", Some(" /a.jpg "), 10).unwrap(),
            Some("/a.jpg".to_string())
        );
    }

    #[test]
    fn test_email() {
        assert!(email("a@b.com").is_ok());
        assert!(email("ab.com").is_err());
        assert!(email("@b.com").is_err());
        assert!(email("a@").is_err());
    }
}
