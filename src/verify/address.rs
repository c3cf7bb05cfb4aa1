//! Address text normalization and matching
//!
//! Grammars, applied to normalized text:
//!
//! ```text
//! street      := letters-and-spaces " " digit+ letter?
//! postal_city := digit{4} " " upper{2} " " city
//! ```
//!
//! Two addresses match only when their normalized forms are byte-equal. No
//! case folding: postal codes are case-sensitive.

use crate::error::{Result, SmokeError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

pub const STREET_PATTERN: &str = r"^[\p{L}][\p{L} ]* \d+[A-Za-z]?$";
pub const POSTAL_CITY_PATTERN: &str = r"^\d{4} [A-Z]{2} [\p{L}'][\p{L} '.-]*$";

fn street_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STREET_PATTERN).expect("street pattern compiles"))
}

fn postal_city_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(POSTAL_CITY_PATTERN).expect("postal pattern compiles"))
}

/// Strip line breaks, collapse whitespace runs, trim
pub fn normalize(raw: &str) -> String {
    let without_breaks: String = raw.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    without_breaks.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize and validate street + house number text
pub fn normalize_street(raw: &str) -> Result<String> {
    let text = normalize(raw);
    if street_regex().is_match(&text) {
        Ok(text)
    } else {
        Err(SmokeError::format("street and house number", raw))
    }
}

/// Normalize and validate postal code + city text
pub fn normalize_postal_city(raw: &str) -> Result<String> {
    let text = normalize(raw);
    if postal_city_regex().is_match(&text) {
        Ok(text)
    } else {
        Err(SmokeError::format("postal code and city", raw))
    }
}

/// Assert two address texts are identical after normalization
pub fn verify_same_address(check: &str, expected: &str, actual: &str) -> Result<()> {
    let expected = normalize(expected);
    let actual = normalize(actual);

    info!("Expected: {}", expected);
    info!("Actual  : {}", actual);

    if expected == actual {
        Ok(())
    } else {
        Err(SmokeError::assertion(check, expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_and_strips() {
        assert_eq!(normalize("  Kerkstraat   12\n"), "Kerkstraat 12");
        assert_eq!(normalize("Kerkstraat\t12\r\n"), "Kerkstraat 12");
        assert_eq!(normalize("\n\n"), "");
    }

    #[test]
    fn test_valid_streets() {
        assert_eq!(normalize_street("Kerkstraat 12\n").unwrap(), "Kerkstraat 12");
        assert_eq!(normalize_street("Van Goghlaan 7b").unwrap(), "Van Goghlaan 7b");
        assert_eq!(normalize_street("Sint Jozefstraat  104A").unwrap(), "Sint Jozefstraat 104A");
        assert_eq!(normalize_street("Hoofdstraat Oost 3").unwrap(), "Hoofdstraat Oost 3");
    }

    #[test]
    fn test_invalid_streets() {
        for raw in ["", "Kerkstraat", "12 Kerkstraat", "Kerkstraat 12AB", "Kerkstraat #12"] {
            assert_eq!(normalize_street(raw).unwrap_err().kind(), "format", "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_valid_postal_city() {
        assert_eq!(
            normalize_postal_city(" 7850 AB  Nieuw-Amsterdam ").unwrap(),
            "7850 AB Nieuw-Amsterdam"
        );
        assert_eq!(normalize_postal_city("1012 JS Amsterdam").unwrap(), "1012 JS Amsterdam");
        assert_eq!(normalize_postal_city("2511 CV 's-Gravenhage").unwrap(), "2511 CV 's-Gravenhage");
    }

    #[test]
    fn test_postal_code_is_case_sensitive() {
        assert!(normalize_postal_city("7850 ab Nieuw-Amsterdam").is_err());
        assert!(normalize_postal_city("785 AB Nieuw-Amsterdam").is_err());
        assert!(normalize_postal_city("7850AB Nieuw-Amsterdam").is_err());
    }

    #[test]
    fn test_matching_is_exact_after_normalization() {
        verify_same_address("street", "Kerkstraat 12\n", " Kerkstraat  12").unwrap();

        let err = verify_same_address("postal", "7850 AB Nieuw-Amsterdam", "7850 ab Nieuw-Amsterdam")
            .unwrap_err();
        assert_eq!(err.kind(), "assertion");
    }
}
