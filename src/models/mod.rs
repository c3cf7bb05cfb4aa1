use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SmokeError;

/// Price suffix shown after every asking price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PriceSuffix {
    /// `k.k.`: buyer pays transfer costs
    KostenKoper,
    /// `v.o.n.`: transfer costs included
    VrijOpNaam,
}

impl PriceSuffix {
    pub const fn token(&self) -> &'static str {
        match self {
            Self::KostenKoper => "k.k.",
            Self::VrijOpNaam => "v.o.n.",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "k.k." => Some(Self::KostenKoper),
            "v.o.n." => Some(Self::VrijOpNaam),
            _ => None,
        }
    }
}

/// Asking price in whole euros
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Money {
    pub amount: u64,
    pub suffix: PriceSuffix,
}

impl Money {
    pub const fn new(amount: u64, suffix: PriceSuffix) -> Self {
        Self { amount, suffix }
    }

    /// Price without suffix, as the filter dropdowns show it: `€ 300.000`
    pub fn amount_label(&self) -> String {
        format!("€ {}", group_thousands(self.amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount_label(), self.suffix.token())
    }
}

impl FromStr for Money {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::verify::money::parse_price(s)
    }
}

/// `1234567` -> `1.234.567`
fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Listing data read from a search result card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingSummary {
    pub street_and_house_number: String,
    pub postal_code_and_city: String,
    pub price: Money,
}

/// Closed price interval; an open end means unbounded
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn between(min: Money, max: Money) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, value: &Money) -> bool {
        self.min.map_or(true, |min| min.amount <= value.amount)
            && self.max.map_or(true, |max| value.amount <= max.amount)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |m: Option<Money>| m.map(|m| m.amount.to_string()).unwrap_or_else(|| "*".to_string());
        write!(f, "[{}, {}]", bound(self.min), bound(self.max))
    }
}

/// Search constraints applied by a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilter {
    /// City as it appears in the location suggestions
    pub city: String,
    pub price_range: PriceRange,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            city: "Nieuw-Amsterdam".to_string(),
            price_range: PriceRange::between(
                Money::new(300_000, PriceSuffix::KostenKoper),
                Money::new(500_000, PriceSuffix::KostenKoper),
            ),
        }
    }
}

/// Result ordering offered by the sort dropdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceAscending,
    PriceDescending,
}

impl SortOrder {
    /// Option label in the sort dropdown
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Relevance => "Relevantie",
            Self::PriceAscending => "Prijs - laag naar hoog",
            Self::PriceDescending => "Prijs - hoog naar laag",
        }
    }

    /// Value the site writes into the `sort` query parameter
    pub const fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::Relevance => None,
            Self::PriceAscending => Some("price_up"),
            Self::PriceDescending => Some("price_down"),
        }
    }
}

/// Login state as rendered in the header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn(String),
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
