//! Address to URL slug derivation for navigation checks

use crate::error::{Result, SmokeError};
use tracing::info;

/// `"Kerkstraat 12\n"` -> `"kerkstraat-12"`
pub fn slug_for(address: &str) -> String {
    let without_breaks: String = address
        .trim()
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();

    without_breaks
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace(' ', "-")
}

/// The slug derived from `address` must appear verbatim in `url`
pub fn verify_url_has_slug(url: &str, address: &str) -> Result<()> {
    let expected_slug = slug_for(address);

    info!("Expected slug: {}", expected_slug);
    info!("Current URL: {}", url);

    if url.contains(&expected_slug) {
        Ok(())
    } else {
        Err(SmokeError::assertion(
            "url contains address slug",
            expected_slug,
            url,
        ))
    }
}

/// Like [`verify_url_has_slug`] but ignoring case, for city segments
pub fn verify_url_mentions(url: &str, text: &str) -> Result<()> {
    let expected_slug = slug_for(text);
    if url.to_lowercase().contains(&expected_slug) {
        Ok(())
    } else {
        Err(SmokeError::assertion("url mentions location", expected_slug, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_for_address() {
        assert_eq!(slug_for("Kerkstraat 12\n"), "kerkstraat-12");
        assert_eq!(slug_for("  Van Goghlaan  7B\r\n"), "van-goghlaan-7b");
        assert_eq!(slug_for("Nieuw-Amsterdam"), "nieuw-amsterdam");
    }

    #[test]
    fn test_url_contains_slug() {
        let url = "https://www.funda.nl/detail/koop/nieuw-amsterdam/huis-kerkstraat-12/43210987/";
        verify_url_has_slug(url, "Kerkstraat 12\n").unwrap();

        let err = verify_url_has_slug(url, "Kerkstraat 14").unwrap_err();
        assert_eq!(err.kind(), "assertion");
        assert!(err.to_string().contains("kerkstraat-14"));
    }

    #[test]
    fn test_url_mentions_city_case_insensitive() {
        let url = "https://www.funda.nl/zoeken/koop?selected_area=%5B%22Nieuw-Amsterdam%22%5D";
        verify_url_mentions(url, "Nieuw-Amsterdam").unwrap();
        assert!(verify_url_mentions(url, "Emmen").is_err());
    }
}
