// Input validation for user accounts
//
// The messages on ValidationError are shown to clients as-is, so they name the
// rule that failed without echoing the submitted value.

use regex::Regex;
use std::sync::LazyLock;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Last-resort upper bound on password size.
/// Hashing cost grows with input, so oversized submissions are rejected early.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Allowed display name length, in characters (after trimming).
pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 50;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Validation failure for user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Password is too long")]
    PasswordTooLong,

    #[error("Name must be between 2 and 50 characters")]
    InvalidNameLength,
}

/// Canonical form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        tracing::warn!(
            "Password exceeds limit: {} bytes (max: {})",
            password.len(),
            MAX_PASSWORD_BYTES
        );
        return Err(ValidationError::PasswordTooLong);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if (MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNameLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "plainaddress",
            "missing-at.example.com",
            "no-tld@example",
            "two@@example.com",
            "spaces in@example.com",
            "@example.com",
        ] {
            assert_eq!(
                validate_email(email),
                Err(ValidationError::InvalidEmail),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn test_password_length() {
        assert_eq!(
            validate_password("short"),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(validate_password("exactly8").is_ok());
        assert_eq!(
            validate_password(&"x".repeat(MAX_PASSWORD_BYTES + 1)),
            Err(ValidationError::PasswordTooLong)
        );
    }

    #[test]
    fn test_password_counts_characters_not_bytes() {
        // 7 multi-byte characters are still too short
        assert_eq!(
            validate_password("ééééééé"),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn test_name_bounds() {
        assert_eq!(validate_name("J"), Err(ValidationError::InvalidNameLength));
        assert_eq!(validate_name("  J  "), Err(ValidationError::InvalidNameLength));
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name(&"a".repeat(50)).is_ok());
        assert_eq!(
            validate_name(&"a".repeat(51)),
            Err(ValidationError::InvalidNameLength)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Invalid email format"
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            ValidationError::InvalidNameLength.to_string(),
            "Name must be between 2 and 50 characters"
        );
    }
}
