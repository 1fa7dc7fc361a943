//! Email validation

use regex::Regex;
use std::sync::OnceLock;

fn basic_email_regex() -> &'static Regex {
    static BASIC_EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    BASIC_EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    })
}

fn domain_segment_regex() -> &'static Regex {
    static DOMAIN_SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    DOMAIN_SEGMENT_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9-]+$").expect("Failed to compile domain segment regex")
    })
}

fn tld_regex() -> &'static Regex {
    static TLD_REGEX: OnceLock<Regex> = OnceLock::new();
    TLD_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z]{2,}$").expect("Failed to compile TLD regex"))
}

/// Validate an email address
///
/// Checks a basic `local@domain.tld` shape first, then the finer-grained
/// rules the signup form relies on. The input is trimmed before validation;
/// callers normalize (trim + lowercase) separately on success.
pub fn validate_email(value: &str) -> Result<(), String> {
    let email = value.trim();

    if !basic_email_regex().is_match(email) {
        return Err("Enter a valid email address".to_string());
    }

    if email.contains("..") {
        return Err("Email cannot contain consecutive dots".to_string());
    }

    let Some((local_part, domain_part)) = email.split_once('@') else {
        return Err("Email must include a domain".to_string());
    };

    if local_part.is_empty() || domain_part.is_empty() {
        return Err("Email must include a domain".to_string());
    }

    if local_part.starts_with('.') || local_part.ends_with('.') {
        return Err("Email local part cannot start or end with a dot".to_string());
    }

    let domain_segments: Vec<&str> = domain_part.split('.').collect();
    if domain_segments.len() < 2 {
        return Err("Email domain must include a valid TLD".to_string());
    }

    for segment in &domain_segments {
        if !domain_segment_regex().is_match(segment) {
            return Err("Email domain contains invalid characters".to_string());
        }
        if segment.starts_with('-') || segment.ends_with('-') {
            return Err("Email domain segments cannot start or end with a hyphen".to_string());
        }
    }

    let tld = domain_segments[domain_segments.len() - 1];
    if !tld_regex().is_match(tld) {
        return Err("Email domain must end with a valid TLD".to_string());
    }

    if domain_part.to_lowercase().ends_with(".con") {
        return Err("Email domain seems misspelled (.con). Please correct it.".to_string());
    }

    Ok(())
}

/// Normalize an email for storage and lookup
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        assert_eq!(validate_email("user@example.com"), Ok(()));
        assert_eq!(validate_email("user@sub-domain.example.co"), Ok(()));
        assert_eq!(validate_email("first.last@example.org"), Ok(()));
        assert_eq!(validate_email("  padded@example.com  "), Ok(()));
    }

    #[test]
    fn rejects_consecutive_dots() {
        assert_eq!(
            validate_email("a..b@example.com"),
            Err("Email cannot contain consecutive dots".to_string())
        );
    }

    #[test]
    fn rejects_local_part_dot_edges() {
        assert!(validate_email(".user@example.com").is_err());
        assert!(validate_email("user.@example.com").is_err());
    }

    #[test]
    fn rejects_misspelled_con_tld() {
        assert_eq!(
            validate_email("user@example.con"),
            Err("Email domain seems misspelled (.con). Please correct it.".to_string())
        );
        assert!(validate_email("user@example.CON").is_err());
    }

    #[test]
    fn rejects_hyphen_edges_in_domain_segments() {
        assert!(validate_email("user@-example.com").is_err());
        assert!(validate_email("user@example-.com").is_err());
    }

    #[test]
    fn rejects_numeric_or_short_tld() {
        assert!(validate_email("user@example.1a").is_err());
        assert!(validate_email("user@example.c").is_err());
    }

    #[test]
    fn rejects_missing_shape() {
        assert!(validate_email("").is_err());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user @example.com").is_err());
    }

    #[test]
    fn normalizes_to_lowercase() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }
}
