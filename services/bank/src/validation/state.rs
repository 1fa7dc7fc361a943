//! U.S. state code validation

/// The 50 states plus DC
const STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Check whether a normalized two-letter code names a U.S. state or DC
pub fn is_valid_state_code(value: &str) -> bool {
    STATE_CODES.contains(&value.to_uppercase().as_str())
}

/// Validate a two-letter U.S. state code
///
/// Input is trimmed and uppercased before matching; callers normalize the
/// same way for storage.
pub fn validate_state_code(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("State is required".to_string());
    }

    let normalized = value.trim().to_uppercase();

    if normalized.len() != 2 || !normalized.chars().all(|c| c.is_ascii_uppercase()) {
        return Err("Use 2-letter state code".to_string());
    }

    if !is_valid_state_code(&normalized) {
        return Err("Enter a valid U.S. state code".to_string());
    }

    Ok(())
}
