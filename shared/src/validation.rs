//! Input validation helpers
//!
//! Length limits and the custom rules plugged into `#[validate(custom(...))]`
//! on the request payloads in [`crate::models`].

use std::borrow::Cow;
use validator::ValidationError;

// ── Text length limits ──────────────────────────────────────────────

/// Employee full names and position names
pub const MAX_NAME_LEN: u64 = 50;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: u64 = 254;

pub const MIN_USERNAME_LEN: u64 = 3;
pub const MAX_USERNAME_LEN: u64 = 150;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: u64 = 8;
pub const MAX_PASSWORD_LEN: u64 = 128;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Person names: ASCII letters and whitespace only, at least one letter.
pub fn validate_person_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be empty"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        return Err(error("letters_only", "may contain only letters and spaces"));
    }
    Ok(())
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be empty"));
    }
    Ok(())
}

/// Usernames: letters, digits and `@.+-_`.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(error(
            "username_chars",
            "may contain only letters, digits and @/./+/-/_",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_accepts_letters_and_spaces() {
        assert!(validate_person_name("Ada Lovelace").is_ok());
        assert!(validate_person_name("Grace  Brewster Hopper").is_ok());
        assert!(validate_person_name("X").is_ok());
    }

    #[test]
    fn test_person_name_rejects_other_characters() {
        for bad in ["R2D2", "O'Brien", "Jean-Luc", "Smith, John", "Ann3", "Zoë"] {
            let err = validate_person_name(bad).unwrap_err();
            assert_eq!(err.code, "letters_only", "{bad}");
        }
    }

    #[test]
    fn test_person_name_rejects_blank() {
        assert_eq!(validate_person_name("").unwrap_err().code, "blank");
        assert_eq!(validate_person_name("   ").unwrap_err().code, "blank");
    }

    #[test]
    fn test_username() {
        assert!(validate_username("jane.doe+hr@corp").is_ok());
        assert!(validate_username("user_01-x").is_ok());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Engineer").is_ok());
        assert!(validate_not_blank(" \t").is_err());
    }
}
