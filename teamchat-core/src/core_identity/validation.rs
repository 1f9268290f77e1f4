//! Validation module
//!
//! Stateless validators for signup input.

use super::errors::IdentityError;

const HANDLE_MIN_LEN: usize = 3;
const HANDLE_MAX_LEN: usize = 20;

/// Validate a requested handle base: 3-20 characters, letters, digits and
/// underscores only. The `@` prefix is added later, after collision probing.
pub fn validate_handle_base(base: &str) -> Result<(), IdentityError> {
    let length_ok = (HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&base.len());
    let charset_ok = base
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if length_ok && charset_ok {
        Ok(())
    } else {
        Err(IdentityError::Validation(
            "Username must be 3-20 characters long and can only contain letters, numbers, and underscores."
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_bases() {
        assert!(validate_handle_base("joe").is_ok());
        assert!(validate_handle_base("user_42").is_ok());
        assert!(validate_handle_base("A2345678901234567890").is_ok());
    }

    #[test]
    fn test_rejects_bad_length() {
        assert!(validate_handle_base("ab").is_err());
        assert!(validate_handle_base("").is_err());
        assert!(validate_handle_base("a23456789012345678901").is_err());
    }

    #[test]
    fn test_rejects_bad_charset() {
        assert!(validate_handle_base("joe smith").is_err());
        assert!(validate_handle_base("joe-smith").is_err());
        assert!(validate_handle_base("@joe").is_err());
        assert!(validate_handle_base("jöe").is_err());
    }
}
