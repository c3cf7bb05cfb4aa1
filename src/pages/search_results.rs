use crate::driver::{
    poll_until, wait_for, wait_for_ready, wait_for_url, Check, Locator, PageDriver, UrlPattern, WaitCondition,
};
use crate::error::{Result, SmokeError};
use crate::models::{ListingSummary, Money, PriceRange, SortOrder};
use crate::pages::Timeouts;
use crate::verify::{
    address::normalize, normalize_postal_city, normalize_street, parse_price, parse_prices,
    text::{assert_contains_ignore_case, assert_equal, assert_true},
    verify_in_range, verify_order, verify_url_mentions,
};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};

const PAGE_HEADER_TEST_ID: &str = "pageHeader";
const PRICE_FROM_INPUT: &str = "[id$='price_from']";
const PRICE_TO_INPUT: &str = "[id='price_to']";
const MIN_PRICE_OPTIONS_TEST_ID: &str = "FilterRangepriceMin";
const MAX_PRICE_OPTIONS_TEST_ID: &str = "FilterRangepriceMax";
const SORT_SELECT: &str = "select[name='sort']";

const RESULTS_LIST: &str = "[data-test-id='search-results']";
const CARD: &str = "[data-test-id='search-result-item']";
const CARD_STREET: &str = "[data-test-id='street-name-house-number']";
const CARD_POSTAL_CITY: &str = "[data-test-id='postal-code-city']";
const CARD_PRICE: &str = "[data-test-id='price-sale']";
const FIRST_CARD_LINK: &str = "[data-test-id='search-result-item'] a";

/// Text of one result card; addresses normalized, price as rendered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardView {
    pub street: String,
    pub postal_city: String,
    pub price: String,
    pub image_count: usize,
}

impl CardView {
    /// Validate every field and build the comparable summary
    pub fn to_summary(&self) -> Result<ListingSummary> {
        Ok(ListingSummary {
            street_and_house_number: normalize_street(&self.street)?,
            postal_code_and_city: normalize_postal_city(&self.postal_city)?,
            price: parse_price(&self.price)?,
        })
    }
}

fn selector(css: &str) -> Selector {
    // All selectors are module constants
    Selector::parse(css).expect("constant selector parses")
}

fn raw_text_of(card: &ElementRef<'_>, sel: &Selector) -> String {
    card.select(sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

fn text_of(card: &ElementRef<'_>, sel: &Selector) -> String {
    normalize(&raw_text_of(card, sel))
}

/// Extract every card from the results list HTML
pub fn parse_cards(html: &str) -> Vec<CardView> {
    let document = Html::parse_fragment(html);
    let card_selector = selector(CARD);
    let street = selector(CARD_STREET);
    let postal_city = selector(CARD_POSTAL_CITY);
    let price = selector(CARD_PRICE);
    let image = selector("img");

    let cards: Vec<CardView> = document
        .select(&card_selector)
        .map(|card| CardView {
            street: text_of(&card, &street),
            postal_city: text_of(&card, &postal_city),
            // Validated by the price grammar only, never normalized
            price: raw_text_of(&card, &price).trim().to_string(),
            image_count: card.select(&image).count(),
        })
        .collect();

    debug!("Found {} result cards in HTML", cards.len());
    cards
}

/// A re-sort only changes the list when it holds two distinct prices
fn reorder_can_change(before: Option<&str>) -> bool {
    match before {
        None => true,
        Some(html) => parse_cards(html).iter().map(|c| c.price.as_str()).collect::<HashSet<_>>().len() > 1,
    }
}

pub struct SearchResultsPage<'a> {
    page: &'a dyn PageDriver,
    timeouts: Timeouts,
}

impl<'a> SearchResultsPage<'a> {
    pub fn new(page: &'a dyn PageDriver, timeouts: Timeouts) -> Self {
        Self { page, timeouts }
    }

    fn selected_location(city: &str) -> Locator {
        Locator::exact_text("div", city)
    }

    /// Location chip for `city` shows in the search box
    pub async fn ensure_selected_location_visible(&self, city: &str) -> Result<()> {
        let header = Locator::test_id(PAGE_HEADER_TEST_ID).within(Locator::text(format!("in {}", city)));
        wait_for(self.page, &Self::selected_location(city), WaitCondition::Visible, self.timeouts.result_set).await?;
        wait_for(self.page, &header, WaitCondition::Visible, self.timeouts.result_set).await?;
        Ok(())
    }

    /// Header and URL both reflect the selected location
    pub async fn verify_results_match_location(&self, city: &str) -> Result<()> {
        let selected = normalize(&self.page.read_text(&Self::selected_location(city)).await?);
        let header = self.page.read_text(&Locator::test_id(PAGE_HEADER_TEST_ID)).await?;
        info!("Selected location: {} | header: {}", selected, normalize(&header));
        assert_contains_ignore_case("header mentions selected location", &selected, &header)?;

        let url = self.page.current_url().await?;
        verify_url_mentions(&url, city)
    }

    /// Results list HTML as currently rendered, if there is a list
    async fn list_snapshot(&self) -> Result<Option<String>> {
        let list = Locator::css(RESULTS_LIST);
        if self.page.count(&list).await? == 0 {
            return Ok(None);
        }
        Ok(Some(self.page.read_html(&list).await?))
    }

    /// Wait until the results list renders something other than `before`
    ///
    /// The URL reflects a filter or sort before the new cards arrive.
    async fn wait_for_new_results(&self, before: Option<String>) -> Result<()> {
        let page = self.page;
        let list = Locator::css(RESULTS_LIST);
        let target = list.to_string();
        let (list, before) = (&list, &before);

        poll_until(&target, "re-rendered", self.timeouts.result_set, move || async move {
            if page.count(list).await? == 0 {
                return Ok(Check::Pending);
            }
            let html = page.read_html(list).await?;
            Ok(if before.as_deref() == Some(html.as_str()) {
                Check::Pending
            } else {
                Check::Observed(())
            })
        })
        .await
    }

    /// Pick the range bounds from the price dropdowns
    pub async fn apply_price_filter(&self, range: &PriceRange) -> Result<()> {
        wait_for_ready(self.page, self.timeouts.result_set).await?;
        let before = self.list_snapshot().await?;

        if let Some(min) = range.min {
            self.pick_price(PRICE_FROM_INPUT, MIN_PRICE_OPTIONS_TEST_ID, &min).await?;
        }
        if let Some(max) = range.max {
            self.pick_price(PRICE_TO_INPUT, MAX_PRICE_OPTIONS_TEST_ID, &max).await?;
        }

        // The site encodes the range as `<min>-<max>` in the query string
        let fragment = format!(
            "{}-{}",
            range.min.map(|m| m.amount.to_string()).unwrap_or_default(),
            range.max.map(|m| m.amount.to_string()).unwrap_or_default()
        );
        wait_for_url(self.page, &UrlPattern::Contains(fragment), self.timeouts.result_set).await?;
        self.wait_for_new_results(before).await?;
        info!("Applied price filter {}", range);
        Ok(())
    }

    async fn pick_price(&self, input: &str, options_test_id: &str, value: &Money) -> Result<()> {
        let input = Locator::css(input);
        wait_for(self.page, &input, WaitCondition::Visible, self.timeouts.interactive).await?;
        self.page.click(&input).await?;

        let option = Locator::test_id(options_test_id).within(Locator::text(value.amount_label()));
        wait_for(self.page, &option, WaitCondition::Visible, self.timeouts.interactive).await?;
        self.page.click(&option).await
    }

    /// Cards currently rendered in the results list
    pub async fn cards(&self) -> Result<Vec<CardView>> {
        let list = Locator::css(RESULTS_LIST);
        wait_for(self.page, &list, WaitCondition::Visible, self.timeouts.result_set).await?;

        let html = self.page.read_html(&list).await?;
        Ok(parse_cards(&html))
    }

    /// Parsed price of every rendered card
    pub async fn rendered_prices(&self) -> Result<Vec<Money>> {
        let cards = self.cards().await?;
        let texts: Vec<&str> = cards.iter().map(|c| c.price.as_str()).collect();
        let prices = parse_prices(&texts)?;
        info!("Rendered prices: {:?}", prices.iter().map(|p| p.amount).collect::<Vec<_>>());
        Ok(prices)
    }

    pub async fn verify_prices_in_range(&self, range: &PriceRange) -> Result<()> {
        let prices = self.rendered_prices().await?;
        assert_true("at least one result after filtering", !prices.is_empty())?;
        verify_in_range(&prices, range)
    }

    pub async fn verify_default_sort(&self) -> Result<()> {
        let sort = Locator::css(SORT_SELECT);
        wait_for(self.page, &sort, WaitCondition::Visible, self.timeouts.interactive).await?;

        let selected = self.page.selected_label(&sort).await?;
        assert_equal("default sort option", SortOrder::Relevance.label(), selected.as_str())
    }

    pub async fn select_sort(&self, order: SortOrder) -> Result<()> {
        let sort = Locator::css(SORT_SELECT);
        wait_for(self.page, &sort, WaitCondition::Enabled, self.timeouts.interactive).await?;
        let before = self.list_snapshot().await?;
        self.page.select_option(&sort, order.label()).await?;

        if let Some(value) = order.query_value() {
            wait_for_url(self.page, &UrlPattern::Contains(value.to_string()), self.timeouts.result_set).await?;
        }
        if reorder_can_change(before.as_deref()) {
            self.wait_for_new_results(before).await?;
        }
        info!("Sorted by {}", order.label());
        Ok(())
    }

    pub async fn verify_sorted(&self, order: SortOrder) -> Result<()> {
        let prices = self.rendered_prices().await?;
        verify_order(&prices, order)
    }

    fn first_card(cards: &[CardView]) -> Result<&CardView> {
        cards
            .first()
            .ok_or_else(|| SmokeError::assertion("result cards rendered", "at least 1", 0))
    }

    pub async fn verify_first_card_image(&self) -> Result<()> {
        let cards = self.cards().await?;
        let card = Self::first_card(&cards)?;
        info!("First card has {} image(s)", card.image_count);
        assert_true("property image on the first card", card.image_count > 0)
    }

    /// Street, postal code + city and price of the first card, validated
    pub async fn read_first_card(&self) -> Result<ListingSummary> {
        let cards = self.cards().await?;
        let summary = Self::first_card(&cards)?.to_summary()?;
        info!(
            "First card: {} | {} | {}",
            summary.street_and_house_number, summary.postal_code_and_city, summary.price
        );
        Ok(summary)
    }

    pub async fn click_first_card(&self) -> Result<()> {
        let link = Locator::css(FIRST_CARD_LINK);
        wait_for(self.page, &link, WaitCondition::Visible, self.timeouts.interactive).await?;
        self.page.click(&link).await
    }
}
