use crate::driver::{wait_for, wait_for_url, Locator, PageDriver, UrlPattern, WaitCondition};
use crate::error::Result;
use crate::models::Money;
use crate::pages::Timeouts;
use crate::verify::{parse_price, text::assert_equal, text::assert_true, verify_same_address, verify_url_has_slug};
use tracing::info;

const STREET_AND_HOUSE_NUMBER: &str = "[class='block text-2xl font-bold md:text-3xl lg:text-4xl']";
const POSTAL_CODE_AND_CITY: &str = "[class='text-neutral-40']";
const PROPERTY_PRICE: &str = "[class='flex gap-2 font-bold']";
const IMAGES_CONTAINER: &str =
    "[class='md:grid gap-1 grid-cols-3 md:grid-cols-4 grid-rows-2 rounded-lg md:max-h-112 md:overflow-hidden']";
const DETAIL_URL_GLOB: &str = "**/detail/**";

pub struct PropertyDetailsPage<'a> {
    page: &'a dyn PageDriver,
    timeouts: Timeouts,
}

impl<'a> PropertyDetailsPage<'a> {
    pub fn new(page: &'a dyn PageDriver, timeouts: Timeouts) -> Self {
        Self { page, timeouts }
    }

    /// Wait for a detail URL and check it carries the card's address slug
    pub async fn verify_navigation(&self, street_and_house_number: &str) -> Result<()> {
        let url = wait_for_url(
            self.page,
            &UrlPattern::Glob(DETAIL_URL_GLOB.to_string()),
            self.timeouts.result_set,
        )
        .await?;
        verify_url_has_slug(&url, street_and_house_number)
    }

    pub async fn verify_street_matches(&self, expected: &str) -> Result<()> {
        let street = Locator::css(STREET_AND_HOUSE_NUMBER);
        wait_for(self.page, &street, WaitCondition::Visible, self.timeouts.interactive).await?;

        let actual = self.page.read_text(&street).await?;
        verify_same_address("street and house number", expected, &actual)
    }

    pub async fn verify_postal_city_matches(&self, expected: &str) -> Result<()> {
        let postal = Locator::css(POSTAL_CODE_AND_CITY);
        wait_for(self.page, &postal, WaitCondition::Visible, self.timeouts.interactive).await?;

        let actual = self.page.read_text(&postal).await?;
        verify_same_address("postal code and city", expected, &actual)
    }

    /// Detail price must be well-formed and equal to the card price
    pub async fn verify_price_matches(&self, expected: &Money) -> Result<()> {
        let price = Locator::css(PROPERTY_PRICE);
        wait_for(self.page, &price, WaitCondition::Visible, self.timeouts.interactive).await?;

        let raw = self.page.read_text(&price).await?;
        info!("Property price on details page: {}", raw.trim());

        let actual = parse_price(&raw)?;
        assert_equal("property price", *expected, actual)
    }

    pub async fn verify_images_displayed(&self) -> Result<()> {
        let container = Locator::css(IMAGES_CONTAINER);
        wait_for(self.page, &container, WaitCondition::Attached, self.timeouts.interactive).await?;

        let images = self.page.count(&container.within(Locator::css("img"))).await?;
        info!("Property has {} image(s) on the details page", images);
        assert_true("at least one property image on the details page", images > 0)
    }
}
