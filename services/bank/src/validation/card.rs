//! Card number validation: brand detection plus Luhn checksum

use regex::Regex;
use std::sync::OnceLock;

/// Supported card brands, matched in order against the full digit string
const CARD_PATTERNS: [(&str, &str); 7] = [
    ("visa", r"^4\d{12}(\d{3})?(\d{3})?$"),
    ("mastercard", r"^(5[1-5]\d{14}|2(2[2-9]\d{13}|[3-7]\d{14}))$"),
    ("amex", r"^3[47]\d{13}$"),
    ("discover", r"^6(?:011|5\d{2})\d{12}$"),
    ("diners", r"^3(?:0[0-5]|[68]\d)\d{11}$"),
    ("jcb", r"^(?:2131|1800|35\d{3})\d{11}$"),
    ("unionpay", r"^62\d{14,17}$"),
];

fn card_regexes() -> &'static Vec<(&'static str, Regex)> {
    static CARD_REGEXES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    CARD_REGEXES.get_or_init(|| {
        CARD_PATTERNS
            .iter()
            .map(|(name, pattern)| {
                (
                    *name,
                    Regex::new(pattern).expect("Failed to compile card brand regex"),
                )
            })
            .collect()
    })
}

fn digit_count_regex() -> &'static Regex {
    static DIGIT_COUNT_REGEX: OnceLock<Regex> = OnceLock::new();
    DIGIT_COUNT_REGEX
        .get_or_init(|| Regex::new(r"^\d{13,19}$").expect("Failed to compile card length regex"))
}

/// Return the brand name matching the digit string, if any
pub fn supported_card_brand(digits: &str) -> Option<&'static str> {
    card_regexes()
        .iter()
        .find(|(_, regex)| regex.is_match(digits))
        .map(|(name, _)| *name)
}

/// Luhn mod-10 checksum
///
/// Doubles every second digit from the rightmost, subtracting 9 when the
/// doubled digit exceeds 9; the sum of all digits must be divisible by 10.
pub fn passes_luhn_check(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut should_double = false;

    for c in digits.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };

        if should_double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }

        sum += digit;
        should_double = !should_double;
    }

    sum % 10 == 0
}

/// Validate a card number
///
/// Whitespace is stripped; the number must be 13-19 digits, match a
/// supported brand pattern, and pass the Luhn checksum. The first failing
/// rule's message is returned.
pub fn validate_card_number(value: &str) -> Result<(), String> {
    let digits_only: String = value.chars().filter(|c| !c.is_whitespace()).collect();

    if !digit_count_regex().is_match(&digits_only) {
        return Err("Card number must be 13-19 digits".to_string());
    }

    if supported_card_brand(&digits_only).is_none() {
        return Err("Unsupported card type".to_string());
    }

    if !passes_luhn_check(&digits_only) {
        return Err("Invalid card number".to_string());
    }

    Ok(())
}
