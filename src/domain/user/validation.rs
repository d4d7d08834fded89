//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// `local@label.label[...]`: one `@`, at least one dot in the domain, no empty labels
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").unwrap()
});

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID must start with a letter or number")]
    InvalidIdStart,

    #[error("User ID must end with a letter or number")]
    InvalidIdEnd,

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("User ID cannot contain consecutive hyphens")]
    ConsecutiveHyphens,

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    FieldTooLong(&'static str, usize),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Password must contain at least one digit")]
    PasswordMissingDigit,

    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,
}

const MAX_USER_ID_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 256;
const MAX_PROFILE_FIELD_LENGTH: usize = 100;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
/// - Only alphanumeric characters and hyphens
/// - Must start and end with alphanumeric
/// - No consecutive hyphens
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    let chars: Vec<char> = id.chars().collect();

    if !chars[0].is_ascii_alphanumeric() {
        return Err(UserValidationError::InvalidIdStart);
    }

    if !chars[chars.len() - 1].is_ascii_alphanumeric() {
        return Err(UserValidationError::InvalidIdEnd);
    }

    let mut prev_hyphen = false;

    for c in &chars {
        if *c == '-' {
            if prev_hyphen {
                return Err(UserValidationError::ConsecutiveHyphens);
            }
            prev_hyphen = true;
        } else if c.is_ascii_alphanumeric() {
            prev_hyphen = false;
        } else {
            return Err(UserValidationError::InvalidIdCharacter(*c));
        }
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a required profile field such as full name or company
pub fn validate_profile_field(
    field: &'static str,
    value: &str,
) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyField(field));
    }

    if value.chars().count() > MAX_PROFILE_FIELD_LENGTH {
        return Err(UserValidationError::FieldTooLong(
            field,
            MAX_PROFILE_FIELD_LENGTH,
        ));
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Between 6 and 128 characters
/// - At least one digit, one lowercase and one uppercase letter
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::PasswordMissingDigit);
    }

    if !password.chars().any(char::is_lowercase) {
        return Err(UserValidationError::PasswordMissingLowercase);
    }

    if !password.chars().any(char::is_uppercase) {
        return Err(UserValidationError::PasswordMissingUppercase);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // User ID tests
    #[test]
    fn test_valid_user_ids() {
        assert!(validate_user_id("admin").is_ok());
        assert!(validate_user_id("u1").is_ok());
        assert!(validate_user_id("0b6f3c2e-9d4a-4c1e-8f7a-2b5d6e7f8a9b").is_ok());
    }

    #[test]
    fn test_empty_user_id() {
        assert_eq!(validate_user_id(""), Err(UserValidationError::EmptyId));
    }

    #[test]
    fn test_user_id_too_long() {
        let long_id = "a".repeat(51);
        assert_eq!(
            validate_user_id(&long_id),
            Err(UserValidationError::IdTooLong(50))
        );
    }

    #[test]
    fn test_user_id_invalid_character() {
        assert_eq!(
            validate_user_id("user_name"),
            Err(UserValidationError::InvalidIdCharacter('_'))
        );
    }

    #[test]
    fn test_user_id_consecutive_hyphens() {
        assert_eq!(
            validate_user_id("user--name"),
            Err(UserValidationError::ConsecutiveHyphens)
        );
    }

    // Email tests
    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("admin@trademanagement.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert_eq!(
            validate_email("no-at-sign"),
            Err(UserValidationError::InvalidEmail)
        );
        assert_eq!(validate_email("@b.com"), Err(UserValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Err(UserValidationError::InvalidEmail));
        assert_eq!(validate_email("a@.com"), Err(UserValidationError::InvalidEmail));
        assert_eq!(
            validate_email("a b@c.com"),
            Err(UserValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email("a@b@c.com"),
            Err(UserValidationError::InvalidEmail)
        );
        assert_eq!(validate_email("a@b..com"), Err(UserValidationError::InvalidEmail));
        assert_eq!(
            validate_email("a@b.com\n"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    // Profile field tests
    #[test]
    fn test_profile_field() {
        assert!(validate_profile_field("Company", "Acme").is_ok());
        assert_eq!(
            validate_profile_field("Company", "   "),
            Err(UserValidationError::EmptyField("Company"))
        );
        assert_eq!(
            validate_profile_field("Full name", &"x".repeat(101)),
            Err(UserValidationError::FieldTooLong("Full name", 100))
        );
    }

    // Password tests
    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("Admin123!").is_ok());
        assert!(validate_password("Abc123").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("Ab1"),
            Err(UserValidationError::PasswordTooShort(6))
        );
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("Aa1{}", "a".repeat(126));
        assert_eq!(
            validate_password(&long_password),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }

    #[test]
    fn test_password_character_classes() {
        assert_eq!(
            validate_password("Abcdefg"),
            Err(UserValidationError::PasswordMissingDigit)
        );
        assert_eq!(
            validate_password("ABC123"),
            Err(UserValidationError::PasswordMissingLowercase)
        );
        assert_eq!(
            validate_password("abc123"),
            Err(UserValidationError::PasswordMissingUppercase)
        );
    }
}
