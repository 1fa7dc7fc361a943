//! Password validation

/// Passwords rejected regardless of complexity, matched case-insensitively
const COMMON_PASSWORDS: [&str; 7] = [
    "password", "12345678", "qwerty", "letmein", "welcome", "admin", "iloveyou",
];

/// Check whether a password appears on the common-password denylist
pub fn is_common_password(value: &str) -> bool {
    let lowered = value.to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

/// Validate password complexity
///
/// Requires at least one uppercase letter, one lowercase letter, one digit,
/// and one non-alphanumeric character; the first violated rule wins. The
/// minimum length (8) is enforced by the signup handler.
pub fn validate_password_complexity(value: &str) -> Result<(), String> {
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    if !value.chars().any(|c| !c.is_alphanumeric()) {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}
