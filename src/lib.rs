//! Smoke suite for the funda.nl listing site
//!
//! Drives Chrome through page objects and checks what the site renders:
//! search, filtering, sorting, login and card-to-detail consistency.
//!
//! - [`verify`]: pure parsing and comparison of extracted text
//! - [`driver`]: the browser boundary, locators and bounded waits
//! - [`pages`]: locators and actions per logical page
//! - [`scenarios`]: named end-to-end flows wrapped in report steps
//! - [`report`]: step log and screenshots written per scenario

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod models;
pub mod pages;
pub mod report;
pub mod scenarios;
pub mod verify;

pub use config::SuiteConfig;
pub use error::{Result, SmokeError};
pub use models::{ListingSummary, Money, PriceRange, PriceSuffix, SearchFilter, SessionState, SortOrder};
pub use scenarios::Scenario;
