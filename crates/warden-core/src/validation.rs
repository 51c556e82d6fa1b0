//! Request field validation

use crate::error::CoreError;

/// Maximum allowed email length
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed length for names and role labels
pub const MAX_FIELD_LENGTH: usize = 128;
/// Maximum allowed password length in bytes (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 1024;

fn require(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("Missing required field: {}", field)));
    }
    Ok(())
}

fn limit(value: &str, field: &str, max: usize) -> Result<(), CoreError> {
    if value.len() > max {
        return Err(CoreError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    require(email, "email")?;
    limit(email, "email", MAX_EMAIL_LENGTH)?;
    if !email.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.is_empty() {
        return Err(CoreError::Validation("Missing required field: password".to_string()));
    }
    limit(password, "password", MAX_PASSWORD_LENGTH)
}

/// Validate a free-form profile field (names, role)
pub fn validate_field(value: &str, field: &str) -> Result<(), CoreError> {
    require(value, field)?;
    limit(value, field, MAX_FIELD_LENGTH)
}
