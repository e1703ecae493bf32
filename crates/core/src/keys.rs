//! Validation for content keys and display names.
//!
//! Keys appear in URLs (`/entities/{key}`), so they are restricted to a
//! lowercase slug alphabet.

use crate::error::CoreError;

/// Maximum length of a content key.
pub const MAX_KEY_LEN: usize = 128;

/// Maximum length of a display name.
pub const MAX_NAME_LEN: usize = 256;

/// Validate a content key: 1-128 chars of `a-z`, `0-9`, `-`, `_`.
///
/// ```
/// use atlas_core::keys::validate_key;
///
/// assert!(validate_key("berlin").is_ok());
/// assert!(validate_key("new-york_2").is_ok());
/// assert!(validate_key("Berlin").is_err());
/// assert!(validate_key("").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(CoreError::Validation(format!(
            "key must be 1-{MAX_KEY_LEN} characters"
        )));
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    {
        return Err(CoreError::Validation(
            "key may only contain lowercase letters, digits, hyphens, and underscores".into(),
        ));
    }
    Ok(())
}

/// Validate a display name: non-blank, at most 256 characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be blank".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_bounds() {
        assert!(validate_key("a").is_ok());
        assert!(validate_key(&"a".repeat(MAX_KEY_LEN)).is_ok());
        assert!(validate_key(&"a".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    #[test]
    fn key_rejects_path_characters() {
        for bad in ["a/b", "a b", "a.b", "ä", "a?b"] {
            assert!(validate_key(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("São Paulo").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
