//! Asking price parsing
//!
//! Grammar of a rendered price (after trimming):
//!
//! ```text
//! price  := "€" ws group ( "." digit{3} )* ws suffix
//! group  := digit{1,3}
//! suffix := "k.k." | "v.o.n."
//! ws     := exactly one whitespace character (space or no-break space)
//! ```
//!
//! Separator is always `.`, currency always `€`. Anything else means the site
//! changed its display format and is reported as a format error. Card and
//! detail prices go through the same grammar; nothing is normalized first.

use crate::error::{Result, SmokeError};
use crate::models::{Money, PriceSuffix};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const PRICE_PATTERN: &str = r"^€\s(\d{1,3}(?:\.\d{3})*)\s(k\.k\.|v\.o\.n\.)$";

fn price_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PRICE_PATTERN).expect("price pattern compiles"))
}

/// Parse rendered price text such as `€ 1.234.567 k.k.`
pub fn parse_price(raw: &str) -> Result<Money> {
    let text = raw.trim();
    let caps = price_regex()
        .captures(text)
        .ok_or_else(|| SmokeError::format("price", raw))?;

    let digits: String = caps[1].chars().filter(|c| *c != '.').collect();
    // Too many digit groups for u64 is still a display problem
    let amount = digits
        .parse::<u64>()
        .map_err(|_| SmokeError::format("price", raw))?;
    let suffix = PriceSuffix::from_token(&caps[2]).ok_or_else(|| SmokeError::format("price", raw))?;

    debug!("Parsed price {:?} -> {} ({})", raw, amount, suffix.token());
    Ok(Money::new(amount, suffix))
}

/// Parse every price, failing on the first malformed one
pub fn parse_prices<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Money>> {
    texts.iter().map(|t| parse_price(t.as_ref())).collect()
}
