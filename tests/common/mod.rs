//! In-memory page used to drive scenarios without a browser

#![allow(dead_code)]

use async_trait::async_trait;
use funda_smoke::driver::{ElementState, Locator, PageDriver};
use funda_smoke::{Result, SmokeError, SuiteConfig};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub text: String,
    pub html: String,
    pub visible: bool,
    pub enabled: bool,
    pub count: usize,
    pub selected: Option<String>,
}

impl FakeElement {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            html: String::new(),
            visible: true,
            enabled: true,
            count: 1,
            selected: None,
        }
    }

    pub fn with_html(html: String) -> Self {
        Self {
            html,
            ..Self::with_text("")
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::with_text("")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Click(Locator),
    Fill(Locator),
    Select(Locator, String),
}

type Hook = Box<dyn Fn(&mut FakeState) + Send + Sync>;

#[derive(Debug, Default)]
pub struct FakeState {
    pub url: String,
    pub elements: HashMap<Locator, FakeElement>,
    /// Unknown locators resolve to a visible, enabled, empty element
    pub lenient: bool,
    pub log: Vec<String>,
    pub screenshots: usize,
    pub fail_close: bool,
    /// Element updates applied after a number of further `read_html` calls
    pub deferred: Vec<(usize, Locator, FakeElement)>,
}

impl FakeState {
    pub fn set(&mut self, locator: Locator, element: FakeElement) {
        self.elements.insert(locator, element);
    }

    /// Apply `element` only after `reads` more HTML reads
    pub fn defer(&mut self, reads: usize, locator: Locator, element: FakeElement) {
        self.deferred.push((reads, locator, element));
    }

    fn tick(&mut self) {
        let mut due = Vec::new();
        for entry in self.deferred.iter_mut() {
            entry.0 = entry.0.saturating_sub(1);
        }
        self.deferred.retain(|(reads, locator, element)| {
            if *reads == 0 {
                due.push((locator.clone(), element.clone()));
                false
            } else {
                true
            }
        });
        for (locator, element) in due {
            self.set(locator, element);
        }
    }

    fn lookup(&self, locator: &Locator) -> Option<FakeElement> {
        match self.elements.get(locator) {
            Some(element) => Some(element.clone()),
            None if self.lenient => Some(FakeElement::with_text("")),
            None => None,
        }
    }
}

pub struct FakePage {
    state: Mutex<FakeState>,
    hooks: Mutex<HashMap<Action, Hook>>,
}

impl FakePage {
    pub fn new(lenient: bool) -> Self {
        Self {
            state: Mutex::new(FakeState {
                lenient,
                ..FakeState::default()
            }),
            hooks: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, locator: Locator, element: FakeElement) {
        self.state.lock().unwrap().set(locator, element);
    }

    pub fn on<F>(&self, action: Action, hook: F)
    where
        F: Fn(&mut FakeState) + Send + Sync + 'static,
    {
        self.hooks.lock().unwrap().insert(action, Box::new(hook));
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn fail_close(&self) {
        self.state.lock().unwrap().fail_close = true;
    }

    pub fn screenshots(&self) -> usize {
        self.state.lock().unwrap().screenshots
    }

    fn fire(&self, action: Action) {
        let hooks = self.hooks.lock().unwrap();
        if let Some(hook) = hooks.get(&action) {
            hook(&mut self.state.lock().unwrap());
        }
    }

    fn element(&self, locator: &Locator) -> Result<FakeElement> {
        self.state
            .lock()
            .unwrap()
            .lookup(locator)
            .ok_or_else(|| SmokeError::Driver(format!("No element matches {}", locator)))
    }

    fn record(&self, entry: String) {
        self.state.lock().unwrap().log.push(entry);
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(format!("navigate {}", url));
        self.state.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn is_ready(&self) -> Result<bool> {
        Ok(true)
    }

    async fn probe(&self, locator: &Locator) -> Result<ElementState> {
        Ok(match self.state.lock().unwrap().lookup(locator) {
            Some(el) => ElementState {
                attached: true,
                visible: el.visible,
                enabled: el.enabled,
            },
            None => ElementState::default(),
        })
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        Ok(self.state.lock().unwrap().lookup(locator).map_or(0, |el| el.count))
    }

    async fn read_text(&self, locator: &Locator) -> Result<String> {
        Ok(self.element(locator)?.text)
    }

    async fn read_html(&self, locator: &Locator) -> Result<String> {
        let html = self.element(locator)?.html;
        self.state.lock().unwrap().tick();
        Ok(html)
    }

    async fn selected_label(&self, locator: &Locator) -> Result<String> {
        self.element(locator)?
            .selected
            .ok_or_else(|| SmokeError::Driver(format!("{} is not a select", locator)))
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        self.element(locator)?;
        self.record(format!("click {}", locator));
        self.fire(Action::Click(locator.clone()));
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        self.element(locator)?;
        self.record(format!("fill {} {}", locator, text));
        self.fire(Action::Fill(locator.clone()));
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, label: &str) -> Result<()> {
        self.element(locator)?;
        self.record(format!("select {} {}", locator, label));
        if let Some(el) = self.state.lock().unwrap().elements.get_mut(locator) {
            el.selected = Some(label.to_string());
        }
        self.fire(Action::Select(locator.clone(), label.to_string()));
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.state.lock().unwrap().screenshots += 1;
        Ok(b"\x89PNG fake".to_vec())
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.log.push("close".to_string());
        if state.fail_close {
            return Err(SmokeError::Driver("page already gone".to_string()));
        }
        Ok(())
    }

    fn driver_name(&self) -> &'static str {
        "fake"
    }
}

/// Config with short waits and reports under `report_dir`
pub fn test_config(report_dir: &Path, with_credentials: bool) -> SuiteConfig {
    let mut config = SuiteConfig::from_lookup(|key| match key {
        "FUNDA_USER_AGENT" => Some("SmokeTest/1.0".to_string()),
        "FUNDA_BASE_URL" => Some("https://www.funda.nl/".to_string()),
        "FUNDA_EMAIL" if with_credentials => Some("tester@example.com".to_string()),
        "FUNDA_PASSWORD" if with_credentials => Some("Secret@123".to_string()),
        _ => None,
    })
    .expect("test config loads");

    config.report_dir = report_dir.to_path_buf();
    config.interactive_timeout = Duration::from_millis(300);
    config.result_set_timeout = Duration::from_millis(600);
    config
}

/// Results list markup for `(street, postal_city, price)` cards
pub fn results_html(cards: &[(&str, &str, &str)]) -> String {
    let items: String = cards
        .iter()
        .map(|(street, postal, price)| {
            format!(
                r#"<li data-test-id="search-result-item">
                     <a href="/detail/koop/x/"><img src="photo.jpg"></a>
                     <h2 data-test-id="street-name-house-number">{}</h2>
                     <div data-test-id="postal-code-city">{}</div>
                     <p data-test-id="price-sale">{}</p>
                   </li>"#,
                street, postal, price
            )
        })
        .collect();
    format!(r#"<ol data-test-id="search-results">{}</ol>"#, items)
}
