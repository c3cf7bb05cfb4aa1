use crate::driver::{wait_for, AriaRole, Locator, PageDriver, WaitCondition};
use crate::error::Result;
use crate::models::Credentials;
use crate::pages::Timeouts;
use tracing::info;

const LOGIN_HEADING: &str = "Inloggen";
const EMAIL_LABEL: &str = "E-mailadres";
const PASSWORD_LABEL: &str = "Wachtwoord";
const SUBMIT_BUTTON: &str = "Log in";

pub struct LoginPage<'a> {
    page: &'a dyn PageDriver,
    timeouts: Timeouts,
}

impl<'a> LoginPage<'a> {
    pub fn new(page: &'a dyn PageDriver, timeouts: Timeouts) -> Self {
        Self { page, timeouts }
    }

    /// Heading plus both field labels
    pub async fn verify_displayed(&self) -> Result<()> {
        let checks = [
            Locator::Role {
                role: AriaRole::Heading,
                name: LOGIN_HEADING.to_string(),
                exact: false,
            },
            Locator::text(EMAIL_LABEL),
            Locator::Text {
                text: PASSWORD_LABEL.to_string(),
                exact: true,
            },
        ];
        for locator in &checks {
            wait_for(self.page, locator, WaitCondition::Visible, self.timeouts.interactive).await?;
        }
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        info!("Logging in as {}", credentials.email);

        let email = Locator::role(AriaRole::Textbox, EMAIL_LABEL);
        let password = Locator::role(AriaRole::Textbox, PASSWORD_LABEL);
        let submit = Locator::role(AriaRole::Button, SUBMIT_BUTTON);

        wait_for(self.page, &email, WaitCondition::Enabled, self.timeouts.interactive).await?;
        self.page.fill(&email, &credentials.email).await?;
        self.page.fill(&password, &credentials.password).await?;
        self.page.click(&submit).await
    }
}
