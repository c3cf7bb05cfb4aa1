pub mod chrome;
pub mod locator;
pub mod traits;
pub mod wait;

pub use chrome::{ChromePage, ChromeSuite};
pub use locator::{AriaRole, Locator};
pub use traits::{ElementState, PageDriver};
pub use wait::{poll_until, wait_for, wait_for_ready, wait_for_url, Check, UrlPattern, WaitCondition};
