//! International phone number validation

use regex::Regex;
use std::sync::OnceLock;

fn international_phone_regex() -> &'static Regex {
    static INTERNATIONAL_PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    INTERNATIONAL_PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[1-9]\d{7,14}$").expect("Failed to compile phone regex")
    })
}

/// Validate an international phone number
///
/// Whitespace is stripped before matching. Accepts an optional leading `+`
/// followed by a non-zero first digit and 7 to 14 more digits.
pub fn validate_phone(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }

    let normalized: String = value.chars().filter(|c| !c.is_whitespace()).collect();

    if !international_phone_regex().is_match(&normalized) {
        return Err("Enter a valid international phone number".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_international_numbers() {
        assert_eq!(validate_phone("+14155552671"), Ok(()));
        assert_eq!(validate_phone("447911123456"), Ok(()));
        assert_eq!(validate_phone("+918888888888"), Ok(()));
    }

    #[test]
    fn accepts_numbers_with_interior_whitespace() {
        assert_eq!(validate_phone("+1 415 555 2671"), Ok(()));
    }

    #[test]
    fn rejects_empty_input_with_distinct_message() {
        assert_eq!(
            validate_phone(""),
            Err("Phone number is required".to_string())
        );
        assert_eq!(
            validate_phone("   "),
            Err("Phone number is required".to_string())
        );
    }

    #[test]
    fn rejects_malformed_numbers() {
        for phone in [
            "00000000",
            "123",
            "+0123456789",
            "++1415",
            "+14155552671999999",
        ] {
            assert!(validate_phone(phone).is_err(), "expected {phone} rejected");
        }
    }
}
