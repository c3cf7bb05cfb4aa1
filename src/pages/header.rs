use crate::driver::{wait_for, AriaRole, Locator, PageDriver, WaitCondition};
use crate::error::Result;
use crate::models::SessionState;
use crate::pages::Timeouts;
use crate::verify::{address::normalize, text::assert_contains};
use tracing::info;

const FUNDA_LINK: &str = "Funda";
const MIJN_HUIS_LINK: &str = "Mijn Huis";
const FAVORIETEN_LINK: &str = "Favorieten";
const INLOGGEN_BUTTON: &str = "Inloggen";
const MELD_JE_AAN_BUTTON: &str = "Meld je aan";
const UITLOGGEN: &str = "Uitloggen";
const SEARCH_BOX_TEST_ID: &str = "search-box";
/// Top-level menus that open a dropdown
const MENU_BUTTONS: [&str; 3] = ["Kopen", "Huren", "Verkopen"];

pub struct HeaderPage<'a> {
    page: &'a dyn PageDriver,
    timeouts: Timeouts,
}

impl<'a> HeaderPage<'a> {
    pub fn new(page: &'a dyn PageDriver, timeouts: Timeouts) -> Self {
        Self { page, timeouts }
    }

    fn login_button() -> Locator {
        Locator::role(AriaRole::Button, INLOGGEN_BUTTON)
    }

    fn account_menu(label: &str) -> Locator {
        Locator::Role {
            role: AriaRole::Button,
            name: label.to_string(),
            exact: false,
        }
    }

    fn landmarks() -> Vec<Locator> {
        let mut landmarks = vec![Locator::role(AriaRole::Link, FUNDA_LINK)];
        landmarks.extend(MENU_BUTTONS.iter().map(|name| Locator::role(AriaRole::Button, *name)));
        landmarks.extend([
            Locator::role(AriaRole::Link, MIJN_HUIS_LINK),
            Locator::role(AriaRole::Link, FAVORIETEN_LINK),
            Self::login_button(),
            Locator::test_id(SEARCH_BOX_TEST_ID),
            Locator::role(AriaRole::Button, MELD_JE_AAN_BUTTON),
        ]);
        landmarks
    }

    /// The Funda logo link marks a rendered header
    pub async fn wait_for_landing_page(&self) -> Result<()> {
        let logo = Locator::role(AriaRole::Link, FUNDA_LINK);
        wait_for(self.page, &logo, WaitCondition::Visible, self.timeouts.interactive).await?;
        Ok(())
    }

    pub async fn assert_ui_elements_displayed(&self) -> Result<()> {
        for landmark in Self::landmarks() {
            wait_for(self.page, &landmark, WaitCondition::Visible, self.timeouts.interactive).await?;
        }
        Ok(())
    }

    /// Kopen / Huren / Verkopen must be usable
    pub async fn verify_menu_buttons_enabled(&self) -> Result<()> {
        for name in MENU_BUTTONS {
            let button = Locator::role(AriaRole::Button, name);
            wait_for(self.page, &button, WaitCondition::Enabled, self.timeouts.interactive).await?;
        }
        Ok(())
    }

    pub async fn click_login(&self) -> Result<()> {
        let button = Self::login_button();
        wait_for(self.page, &button, WaitCondition::Enabled, self.timeouts.interactive).await?;
        self.page.click(&button).await
    }

    /// Logged in once the account menu shows `account_label`
    pub async fn verify_logged_in(&self, account_label: &str) -> Result<SessionState> {
        let menu = Self::account_menu(account_label);
        wait_for(self.page, &menu, WaitCondition::Visible, self.timeouts.interactive).await?;

        let label = normalize(&self.page.read_text(&menu).await?);
        assert_contains("account label", account_label, &label)?;

        info!("Logged in as {}", label);
        Ok(SessionState::LoggedIn(label))
    }

    pub async fn logout(&self, account_label: &str) -> Result<()> {
        let menu = Self::account_menu(account_label);
        wait_for(self.page, &menu, WaitCondition::Enabled, self.timeouts.interactive).await?;
        self.page.click(&menu).await?;

        let logout = Locator::text(UITLOGGEN);
        wait_for(self.page, &logout, WaitCondition::Visible, self.timeouts.interactive).await?;
        self.page.click(&logout).await
    }

    /// Logged out once the Inloggen button is back
    pub async fn verify_logged_out(&self) -> Result<SessionState> {
        wait_for(self.page, &Self::login_button(), WaitCondition::Visible, self.timeouts.interactive).await?;
        info!("Logged out");
        Ok(SessionState::LoggedOut)
    }
}
