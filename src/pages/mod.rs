//! Page objects for the listing site
//!
//! Each page is a borrowed driver plus named locators. Pages keep no state
//! between calls; anything a later check needs is returned to the scenario.

pub mod header;
pub mod landing;
pub mod login;
pub mod property_details;
pub mod search_results;

pub use header::HeaderPage;
pub use landing::LandingPage;
pub use login::LoginPage;
pub use property_details::PropertyDetailsPage;
pub use search_results::{CardView, SearchResultsPage};

use crate::config::SuiteConfig;
use std::time::Duration;

/// Wait budgets handed to every page
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub interactive: Duration,
    pub result_set: Duration,
}

impl From<&SuiteConfig> for Timeouts {
    fn from(config: &SuiteConfig) -> Self {
        Self {
            interactive: config.interactive_timeout,
            result_set: config.result_set_timeout,
        }
    }
}
