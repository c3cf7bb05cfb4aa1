//! Named smoke scenarios
//!
//! A scenario is a straight line of page actions grouped into report steps.
//! The first failing step ends the scenario; there is no partial success.

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::error::Result;
use crate::models::{SearchFilter, SortOrder};
use crate::pages::{HeaderPage, LandingPage, LoginPage, PropertyDetailsPage, SearchResultsPage, Timeouts};
use crate::report::{Reporter, ScenarioReport};
use clap::ValueEnum;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    LandingPage,
    SearchAndFilter,
    Sorting,
    LoginLogout,
    PropertyDetails,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Self::LandingPage,
        Self::SearchAndFilter,
        Self::Sorting,
        Self::LoginLogout,
        Self::PropertyDetails,
    ];

    /// Directory / CLI name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LandingPage => "landing-page",
            Self::SearchAndFilter => "search-and-filter",
            Self::Sorting => "sorting",
            Self::LoginLogout => "login-logout",
            Self::PropertyDetails => "property-details",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::LandingPage => "Check landing page load and navigation",
            Self::SearchAndFilter => "Verify search and filtering functionality",
            Self::Sorting => "Verify sorting functionality in search results page",
            Self::LoginLogout => "Verify login and logout functionality",
            Self::PropertyDetails => "Verify property card and details page information",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `scenario` on a fresh page and write its report
///
/// A failure screenshot is attached when the page can still take one.
pub async fn run_with_report(
    scenario: Scenario,
    page: &dyn PageDriver,
    config: &SuiteConfig,
) -> Result<ScenarioReport> {
    info!("🏠 {} ({})", scenario.title(), page.driver_name());

    let reporter = Reporter::new(&config.report_dir, scenario.name())?;
    let filter = SearchFilter::default();
    let outcome = run(scenario, page, config, &filter, &reporter).await;

    if let Err(err) = &outcome {
        warn!("Scenario {} failed: {}", scenario, err);
        if let Err(shot_err) = reporter.screenshot(page, "Failure Screenshot").await {
            warn!("Could not capture failure screenshot: {}", shot_err);
        }
    }

    reporter.finish(&outcome)
}

/// Run `scenario` with a report, then close its page
///
/// A page that fails to close is logged; the report still stands.
pub async fn run_and_close(
    scenario: Scenario,
    page: &dyn PageDriver,
    config: &SuiteConfig,
) -> Result<ScenarioReport> {
    let report = run_with_report(scenario, page, config).await;
    if let Err(err) = page.close().await {
        warn!("Could not close page after {}: {}", scenario, err);
    }
    report
}

pub async fn run(
    scenario: Scenario,
    page: &dyn PageDriver,
    config: &SuiteConfig,
    filter: &SearchFilter,
    reporter: &Reporter,
) -> Result<()> {
    match scenario {
        Scenario::LandingPage => landing_page(page, config, reporter).await,
        Scenario::SearchAndFilter => search_and_filter(page, config, filter, reporter).await,
        Scenario::Sorting => sorting(page, config, filter, reporter).await,
        Scenario::LoginLogout => login_logout(page, config, reporter).await,
        Scenario::PropertyDetails => property_details(page, config, filter, reporter).await,
    }
}

/// Open the landing page, dismiss cookies, wait for the header
async fn go_to_landing_page(page: &dyn PageDriver, config: &SuiteConfig, reporter: &Reporter) -> Result<()> {
    let timeouts = Timeouts::from(config);
    let landing = LandingPage::new(page, timeouts);
    let header = HeaderPage::new(page, timeouts);

    reporter
        .step("Navigate to LandingPage", async {
            landing.go_to(&config.base_url).await?;
            landing.accept_cookies().await?;
            header.wait_for_landing_page().await
        })
        .await
}

/// Search for the filter city from the landing page
async fn search_location(
    page: &dyn PageDriver,
    config: &SuiteConfig,
    filter: &SearchFilter,
    reporter: &Reporter,
) -> Result<()> {
    let landing = LandingPage::new(page, Timeouts::from(config));

    reporter
        .step("Search with location filter", async {
            landing.search_with_location(&filter.city).await?;
            reporter.screenshot(page, "EnterLocation Screenshot").await
        })
        .await
}

/// Selected location shows and the results belong to it
async fn verify_location(
    page: &dyn PageDriver,
    config: &SuiteConfig,
    filter: &SearchFilter,
    reporter: &Reporter,
) -> Result<()> {
    let results = SearchResultsPage::new(page, Timeouts::from(config));

    reporter
        .step("Verify that the selected location is displayed in the search box", async {
            results.ensure_selected_location_visible(&filter.city).await?;
            reporter.screenshot(page, "SelectedLocation Screenshot").await
        })
        .await?;

    reporter
        .step(
            "Verify that search results match the selected location",
            results.verify_results_match_location(&filter.city),
        )
        .await
}

pub async fn landing_page(page: &dyn PageDriver, config: &SuiteConfig, reporter: &Reporter) -> Result<()> {
    let timeouts = Timeouts::from(config);
    let landing = LandingPage::new(page, timeouts);
    let header = HeaderPage::new(page, timeouts);

    go_to_landing_page(page, config, reporter).await?;

    reporter
        .step("Verify key UI elements on LandingPage-Header", async {
            header.assert_ui_elements_displayed().await?;
            reporter.screenshot(page, "LandingPage-header Screenshot").await
        })
        .await?;

    reporter
        .step("Verify header buttons are clickable", header.verify_menu_buttons_enabled())
        .await?;

    reporter
        .step("Verify key UI elements on LandingPage-Body", async {
            landing.assert_body_elements_visible().await?;
            reporter.screenshot(page, "LandingPage-body Screenshot").await
        })
        .await
}

pub async fn search_and_filter(
    page: &dyn PageDriver,
    config: &SuiteConfig,
    filter: &SearchFilter,
    reporter: &Reporter,
) -> Result<()> {
    let timeouts = Timeouts::from(config);
    let header = HeaderPage::new(page, timeouts);
    let results = SearchResultsPage::new(page, timeouts);

    go_to_landing_page(page, config, reporter).await?;
    search_location(page, config, filter, reporter).await?;

    reporter
        .step("Verify key UI elements on SearchResultsPage-Header", async {
            header.assert_ui_elements_displayed().await?;
            reporter.screenshot(page, "SearchResultsPage-Header Screenshot").await
        })
        .await?;

    verify_location(page, config, filter, reporter).await?;

    reporter
        .step("Apply price filter", async {
            results.apply_price_filter(&filter.price_range).await?;
            reporter.screenshot(page, "PriceFilterApplied Screenshot").await
        })
        .await?;

    reporter
        .step(
            "Verify search results respect the applied price filter",
            results.verify_prices_in_range(&filter.price_range),
        )
        .await
}

pub async fn sorting(
    page: &dyn PageDriver,
    config: &SuiteConfig,
    filter: &SearchFilter,
    reporter: &Reporter,
) -> Result<()> {
    let results = SearchResultsPage::new(page, Timeouts::from(config));

    go_to_landing_page(page, config, reporter).await?;
    search_location(page, config, filter, reporter).await?;
    verify_location(page, config, filter, reporter).await?;

    reporter
        .step("Verify default sorting option", async {
            results.verify_default_sort().await?;
            reporter.screenshot(page, "DefaultSortingOption Screenshot").await
        })
        .await?;

    for (order, shot) in [
        (SortOrder::PriceAscending, "PriceLowToHigh Screenshot"),
        (SortOrder::PriceDescending, "PriceHighToLow Screenshot"),
    ] {
        reporter
            .step(&format!("Select sorting option: {}", order.label()), results.select_sort(order))
            .await?;

        reporter
            .step(&format!("Verify sorting by {}", order.label()), async {
                results.verify_sorted(order).await?;
                reporter.screenshot(page, shot).await
            })
            .await?;
    }
    Ok(())
}

pub async fn login_logout(page: &dyn PageDriver, config: &SuiteConfig, reporter: &Reporter) -> Result<()> {
    // Fail before touching the browser when credentials are missing
    let credentials = config.require_credentials()?;

    let timeouts = Timeouts::from(config);
    let header = HeaderPage::new(page, timeouts);
    let login = LoginPage::new(page, timeouts);

    go_to_landing_page(page, config, reporter).await?;

    reporter.step("Click Inloggen button", header.click_login()).await?;

    reporter
        .step("Verify navigation to the Login page and validate its content", login.verify_displayed())
        .await?;

    reporter
        .step("Login with valid credentials", async {
            login.login(credentials).await?;
            reporter.screenshot(page, "LoggedIn Screenshot").await
        })
        .await?;

    let session = reporter
        .step("Verify success login", header.verify_logged_in(&config.account_label))
        .await?;
    info!("Session: {:?}", session);

    reporter
        .step("Logout", async {
            header.logout(&config.account_label).await?;
            reporter.screenshot(page, "Logout Screenshot").await
        })
        .await?;

    let session = reporter
        .step("Verify successful logout", async {
            let session = header.verify_logged_out().await?;
            reporter.screenshot(page, "LoggedOut Screenshot").await?;
            Ok(session)
        })
        .await?;
    info!("Session: {:?}", session);
    Ok(())
}

pub async fn property_details(
    page: &dyn PageDriver,
    config: &SuiteConfig,
    filter: &SearchFilter,
    reporter: &Reporter,
) -> Result<()> {
    let timeouts = Timeouts::from(config);
    let results = SearchResultsPage::new(page, timeouts);
    let details = PropertyDetailsPage::new(page, timeouts);

    go_to_landing_page(page, config, reporter).await?;
    search_location(page, config, filter, reporter).await?;

    reporter
        .step("Verify that property image exists on the card", async {
            results.verify_first_card_image().await?;
            reporter.screenshot(page, "PropertyImageExists Screenshot").await
        })
        .await?;

    let card = reporter
        .step("Validate address, postal code and price on the card", results.read_first_card())
        .await?;

    reporter
        .step("Click the first property card to navigate to the details page", results.click_first_card())
        .await?;

    reporter
        .step("Verify navigation to the property details page", async {
            details.verify_navigation(&card.street_and_house_number).await?;
            reporter.screenshot(page, "PropertyDetailsPage Screenshot").await
        })
        .await?;

    reporter
        .step(
            "Verify that the street name and house number match",
            details.verify_street_matches(&card.street_and_house_number),
        )
        .await?;

    reporter
        .step(
            "Verify that the postal code and city match",
            details.verify_postal_city_matches(&card.postal_code_and_city),
        )
        .await?;

    reporter
        .step("Verify that the property price matches", details.verify_price_matches(&card.price))
        .await?;

    reporter
        .step("Check that the property image is displayed", details.verify_images_displayed())
        .await
}
