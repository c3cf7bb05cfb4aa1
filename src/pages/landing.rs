use crate::driver::{wait_for, wait_for_ready, AriaRole, Locator, PageDriver, WaitCondition};
use crate::error::{Result, SmokeError};
use crate::pages::Timeouts;
use std::time::Duration;
use tracing::{debug, info};

const SEARCH_BOX_TEST_ID: &str = "search-box";
const ACCEPT_COOKIES_BUTTON: &str = "Alles accepteren";
/// Suggestion text is `<city> Plaats in <province>`
const CITY_OPTION_MARKER: &str = "Plaats in";
/// The banner is optional; longest we give it to show up
const COOKIE_BANNER_GRACE: Duration = Duration::from_secs(5);

pub struct LandingPage<'a> {
    page: &'a dyn PageDriver,
    timeouts: Timeouts,
}

impl<'a> LandingPage<'a> {
    pub fn new(page: &'a dyn PageDriver, timeouts: Timeouts) -> Self {
        Self { page, timeouts }
    }

    fn search_box() -> Locator {
        Locator::test_id(SEARCH_BOX_TEST_ID)
    }

    pub async fn go_to(&self, url: &str) -> Result<()> {
        self.page.navigate(url).await?;
        wait_for_ready(self.page, self.timeouts.interactive).await
    }

    /// Accept the cookie banner if it is shown
    pub async fn accept_cookies(&self) -> Result<()> {
        let button = Locator::role(AriaRole::Button, ACCEPT_COOKIES_BUTTON);

        let grace = COOKIE_BANNER_GRACE.min(self.timeouts.interactive);

        match wait_for(self.page, &button, WaitCondition::Visible, grace).await {
            Ok(_) => {
                self.page.click(&button).await?;
                wait_for_ready(self.page, self.timeouts.interactive).await?;
                info!("Accepted cookies");
                Ok(())
            }
            Err(SmokeError::Timeout { .. }) => {
                debug!("No cookie banner shown");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Body landmarks of the landing page
    pub async fn assert_body_elements_visible(&self) -> Result<()> {
        wait_for(self.page, &Self::search_box(), WaitCondition::Visible, self.timeouts.interactive).await?;
        Ok(())
    }

    /// Type a city and pick it from the suggestions
    pub async fn search_with_location(&self, city: &str) -> Result<()> {
        info!("Searching for {}", city);

        let search_box = Self::search_box();
        wait_for(self.page, &search_box, WaitCondition::Enabled, self.timeouts.interactive).await?;
        self.page.fill(&search_box, city).await?;

        let option = Locator::text(format!("{} {}", city, CITY_OPTION_MARKER));
        wait_for(self.page, &option, WaitCondition::Visible, self.timeouts.interactive).await?;
        self.page.click(&option).await
    }
}
