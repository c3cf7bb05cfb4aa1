use crate::config::SuiteConfig;
use crate::driver::locator::Locator;
use crate::driver::traits::{ElementState, PageDriver};
use crate::error::{Result, SmokeError};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::protocol::cdp::Target::DisposeBrowserContext;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// One Chrome process shared by every scenario of a run
pub struct ChromeSuite {
    browser: Browser,
    user_agent: String,
}

impl ChromeSuite {
    /// Launch Chrome once for the whole suite
    pub fn launch(config: &SuiteConfig) -> Result<Self> {
        info!(
            "Launching Chrome (headless: {}, size: {}x{})...",
            config.headless, config.viewport.0, config.viewport.1
        );

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.viewport))
            // Result-set waits poll for up to a minute
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| SmokeError::driver("Failed to build launch options", e))?;

        let browser = Browser::new(options).map_err(|e| SmokeError::driver("Failed to launch Chrome browser", e))?;

        Ok(Self {
            browser,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Open a tab in a fresh browser context (own cookies and storage)
    pub fn new_page(&self) -> Result<ChromePage> {
        let context = self
            .browser
            .new_context()
            .map_err(|e| SmokeError::driver("Failed to create browser context", e))?;
        let tab = context
            .new_tab()
            .map_err(|e| SmokeError::driver("Failed to open tab", e))?;

        tab.set_user_agent(&self.user_agent, None, None)
            .map_err(|e| SmokeError::driver("Failed to set user agent", e))?;

        let context_id = context.get_id().to_string();
        debug!("Opened tab in browser context {}", context_id);
        Ok(ChromePage {
            browser: self.browser.clone(),
            context_id,
            tab,
        })
    }

    /// Dispose of the browser after the last scenario
    pub fn shutdown(self) {
        info!("Closing Chrome");
        drop(self.browser);
    }
}

/// A Chrome tab driven through injected JavaScript
pub struct ChromePage {
    browser: Browser,
    /// Isolated context owning the tab's cookies and storage
    context_id: String,
    tab: Arc<Tab>,
}

fn dispose_command(context_id: &str) -> DisposeBrowserContext {
    DisposeBrowserContext {
        browser_context_id: context_id.to_string(),
    }
}

impl ChromePage {

    /// Evaluate `expression` and decode its JSON-serialized value
    ///
    /// Results travel as a JSON string since CDP only returns primitives by value.
    fn eval<T: DeserializeOwned>(&self, expression: &str) -> Result<T> {
        let script = format!("JSON.stringify({})", expression);
        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| SmokeError::driver("JavaScript evaluation failed", e))?;

        let json = result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .ok_or_else(|| SmokeError::Driver("Script returned no value".to_string()))?;
        Ok(serde_json::from_str(json)?)
    }

    /// Run `body` against the first match, failing if nothing matches
    fn eval_first<T: DeserializeOwned>(&self, locator: &Locator, body: &str) -> Result<T> {
        let script = locator.script(&format!(
            "els => els.length ? {{ found: true, value: ({})(els[0]) }} : {{ found: false }}",
            body
        ));
        let outcome: FirstMatch<T> = self.eval(&script)?;
        match outcome.value {
            Some(value) if outcome.found => Ok(value),
            _ => Err(SmokeError::Driver(format!("No element matches {}", locator))),
        }
    }
}

#[derive(serde::Deserialize)]
struct FirstMatch<T> {
    found: bool,
    value: Option<T>,
}

const NATIVE_SETTER: &str = r#"(el, v) => {
  const proto = Object.getPrototypeOf(el);
  const desc = Object.getOwnPropertyDescriptor(proto, 'value');
  if (desc && desc.set) { desc.set.call(el, v); } else { el.value = v; }
  el.dispatchEvent(new Event('input', { bubbles: true }));
  el.dispatchEvent(new Event('change', { bubbles: true }));
}"#;

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| SmokeError::driver(&format!("Failed to navigate to {}", url), e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| SmokeError::driver(&format!("Navigation timeout for {}", url), e))?;

        info!("Navigated to {}", url);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    async fn is_ready(&self) -> Result<bool> {
        self.eval("document.readyState === 'complete'")
    }

    async fn probe(&self, locator: &Locator) -> Result<ElementState> {
        let script = locator.script(
            "els => { const el = els[0]; if (!el) return { attached: false, visible: false, enabled: false }; \
             return { attached: true, visible: __loc.visible(el), \
             enabled: !el.disabled && el.getAttribute('aria-disabled') !== 'true' }; }",
        );
        self.eval(&script)
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        self.eval(&locator.script("els => els.length"))
    }

    async fn read_text(&self, locator: &Locator) -> Result<String> {
        self.eval_first(locator, "el => el.innerText")
    }

    async fn read_html(&self, locator: &Locator) -> Result<String> {
        self.eval_first(locator, "el => el.outerHTML")
    }

    async fn selected_label(&self, locator: &Locator) -> Result<String> {
        self.eval_first(
            locator,
            "el => { const o = el.options && el.options[el.selectedIndex]; return o ? o.label.trim() : ''; }",
        )
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        debug!("Clicking {}", locator);
        let _: bool = self.eval_first(
            locator,
            "el => { el.scrollIntoView({ block: 'center' }); el.click(); return true; }",
        )?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        debug!("Filling {} with {:?}", locator, text);
        let _: bool = self.eval_first(
            locator,
            &format!("el => {{ el.focus(); ({})(el, ''); return true; }}", NATIVE_SETTER),
        )?;

        // Real key events so autocomplete suggestions open
        self.tab
            .type_str(text)
            .map_err(|e| SmokeError::driver(&format!("Failed to type into {}", locator), e))?;
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, label: &str) -> Result<()> {
        debug!("Selecting {:?} in {}", label, locator);
        let label_js = serde_json::Value::String(label.to_string()).to_string();
        let found: bool = self.eval_first(
            locator,
            &format!(
                "el => {{ const o = Array.from(el.options || []).find(o => o.label.trim() === {label}); \
                 if (!o) return false; ({setter})(el, o.value); return true; }}",
                label = label_js,
                setter = NATIVE_SETTER
            ),
        )?;

        if found {
            Ok(())
        } else {
            Err(SmokeError::Driver(format!("{} has no option labelled {:?}", locator, label)))
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| SmokeError::driver("Screenshot capture failed", e))
    }

    async fn close(&self) -> Result<()> {
        self.tab
            .close(false)
            .map_err(|e| SmokeError::driver("Failed to close tab", e))?;
        self.browser
            .call_method(dispose_command(&self.context_id))
            .map_err(|e| SmokeError::driver("Failed to dispose browser context", e))?;

        debug!("Disposed browser context {}", self.context_id);
        Ok(())
    }

    fn driver_name(&self) -> &'static str {
        "chrome"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_targets_the_page_context() {
        let command = serde_json::to_value(dispose_command("CTX-42")).unwrap();
        assert_eq!(command["browserContextId"], "CTX-42");
    }
}
