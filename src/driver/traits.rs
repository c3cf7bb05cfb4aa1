use crate::driver::locator::Locator;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Snapshot of the first element a locator resolves to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementState {
    pub attached: bool,
    pub visible: bool,
    pub enabled: bool,
}

/// One browser page as the page objects see it
///
/// Implemented by the Chrome tab driver and by in-memory fakes in tests.
/// Operations never wait on their own; waiting goes through
/// [`crate::driver::wait`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for the navigation to commit
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Address currently shown in the location bar
    async fn current_url(&self) -> Result<String>;

    /// Whether the document finished loading
    async fn is_ready(&self) -> Result<bool>;

    /// Attachment / visibility / enabled state of the first match
    async fn probe(&self, locator: &Locator) -> Result<ElementState>;

    /// Number of matching elements
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Rendered text of the first match
    async fn read_text(&self, locator: &Locator) -> Result<String>;

    /// Outer HTML of the first match
    async fn read_html(&self, locator: &Locator) -> Result<String>;

    /// Label of the selected option of a `<select>`
    async fn selected_label(&self, locator: &Locator) -> Result<String>;

    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the value of an input by typing `text`
    async fn fill(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Pick the option labelled `label` in a `<select>`
    async fn select_option(&self, locator: &Locator, label: &str) -> Result<()>;

    /// PNG of the full page
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Tear the page down along with its isolated session
    async fn close(&self) -> Result<()>;

    /// Name of the driver for logs
    fn driver_name(&self) -> &'static str;
}
