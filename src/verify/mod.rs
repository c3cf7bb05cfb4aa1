//! Normalization and verification of text read from the site
//!
//! Everything here is pure: raw strings in, canonical values or a
//! `SmokeError` out. Page objects call into these after extracting text.

pub mod address;
pub mod money;
pub mod order;
pub mod slug;
pub mod text;

pub use address::{normalize, normalize_postal_city, normalize_street, verify_same_address};
pub use money::{parse_price, parse_prices};
pub use order::{verify_in_range, verify_order, verify_value_in_range};
pub use slug::{slug_for, verify_url_has_slug, verify_url_mentions};
