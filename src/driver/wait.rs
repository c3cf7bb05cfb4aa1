//! Bounded waiting on page state
//!
//! Every wait is a two-state check: `Pending` until the driver reports the
//! condition holds, then `Observed` with the observed value. Running out of
//! budget is terminal and surfaces as `SmokeError::Timeout`; nothing retries.

use crate::driver::locator::Locator;
use crate::driver::traits::{ElementState, PageDriver};
use crate::error::{Result, SmokeError};
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Delay between two probes
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq)]
pub enum Check<T> {
    Pending,
    Observed(T),
}

/// Element condition to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    Attached,
    Visible,
    Enabled,
}

impl WaitCondition {
    pub fn holds(&self, state: &ElementState) -> bool {
        match self {
            Self::Attached => state.attached,
            Self::Visible => state.attached && state.visible,
            Self::Enabled => state.attached && state.visible && state.enabled,
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Visible => "visible",
            Self::Enabled => "enabled",
        };
        f.write_str(name)
    }
}

/// URL condition to wait for
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Substring of the URL
    Contains(String),
    /// Whole-URL glob: `**` spans path segments, `*` stays within one
    Glob(String),
}

impl UrlPattern {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Contains(fragment) => url.contains(fragment.as_str()),
            Self::Glob(glob) => glob_regex(glob).is_match(url),
        }
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(fragment) => write!(f, "url containing {:?}", fragment),
            Self::Glob(glob) => write!(f, "url matching {}", glob),
        }
    }
}

fn glob_regex(glob: &str) -> Regex {
    let mut pattern = String::from("^");
    let mut rest = glob;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("**") {
            pattern.push_str(".*");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('*') {
            pattern.push_str("[^/]*");
            rest = tail;
        } else {
            let ch = rest.chars().next().unwrap_or_default();
            pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
            rest = &rest[ch.len_utf8()..];
        }
    }
    pattern.push('$');
    // Only escaped literals and fixed fragments, so this always compiles
    Regex::new(&pattern).expect("glob regex compiles")
}

/// Poll `probe` until it observes a value or `budget` runs out
pub async fn poll_until<T, F, Fut>(target: &str, condition: &str, budget: Duration, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Check<T>>>,
{
    let started = Instant::now();
    loop {
        if let Check::Observed(value) = probe().await? {
            debug!("{} is {} after {:?}", target, condition, started.elapsed());
            return Ok(value);
        }

        let waited = started.elapsed();
        if waited >= budget {
            return Err(SmokeError::Timeout {
                locator: target.to_string(),
                condition: condition.to_string(),
                waited,
            });
        }
        sleep(POLL_INTERVAL.min(budget - waited)).await;
    }
}

/// Wait until the first element matching `locator` satisfies `condition`
pub async fn wait_for(
    driver: &dyn PageDriver,
    locator: &Locator,
    condition: WaitCondition,
    budget: Duration,
) -> Result<ElementState> {
    poll_until(&locator.to_string(), &condition.to_string(), budget, || async move {
        let state = driver.probe(locator).await?;
        Ok(if condition.holds(&state) {
            Check::Observed(state)
        } else {
            Check::Pending
        })
    })
    .await
}

/// Wait until the page URL matches `pattern`; returns the URL
pub async fn wait_for_url(driver: &dyn PageDriver, pattern: &UrlPattern, budget: Duration) -> Result<String> {
    poll_until("page", &pattern.to_string(), budget, || async move {
        let url = driver.current_url().await?;
        Ok(if pattern.matches(&url) {
            Check::Observed(url)
        } else {
            Check::Pending
        })
    })
    .await
}

/// Wait until the document reports it finished loading
pub async fn wait_for_ready(driver: &dyn PageDriver, budget: Duration) -> Result<()> {
    poll_until("document", "loaded", budget, || async move {
        Ok(if driver.is_ready().await? {
            Check::Observed(())
        } else {
            Check::Pending
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_build_on_each_other() {
        let hidden = ElementState {
            attached: true,
            visible: false,
            enabled: true,
        };
        assert!(WaitCondition::Attached.holds(&hidden));
        assert!(!WaitCondition::Visible.holds(&hidden));
        assert!(!WaitCondition::Enabled.holds(&hidden));

        let detached = ElementState::default();
        assert!(!WaitCondition::Attached.holds(&detached));
    }

    #[test]
    fn test_glob_patterns() {
        let detail = UrlPattern::Glob("**/detail/**".to_string());
        assert!(detail.matches("https://www.funda.nl/detail/koop/emmen/huis-kerkstraat-12/4321/"));
        assert!(!detail.matches("https://www.funda.nl/zoeken/koop?selected_area=emmen"));

        let single = UrlPattern::Glob("https://www.funda.nl/*/".to_string());
        assert!(single.matches("https://www.funda.nl/koop/"));
        assert!(!single.matches("https://www.funda.nl/koop/emmen/"));
    }

    #[test]
    fn test_contains_pattern() {
        let sort = UrlPattern::Contains("price_up".to_string());
        assert!(sort.matches("https://www.funda.nl/zoeken/koop?sort=%22price_up%22"));
        assert!(!sort.matches("https://www.funda.nl/zoeken/koop"));
    }

    #[tokio::test]
    async fn test_poll_until_observes_after_pending() {
        let mut calls = 0;
        let value = poll_until("counter", "three", Duration::from_secs(5), || {
            calls += 1;
            let seen = calls;
            async move { Ok(if seen >= 3 { Check::Observed(seen) } else { Check::Pending }) }
        })
        .await
        .unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let err = poll_until::<(), _, _>("testid=search-box", "visible", Duration::from_millis(30), || async {
            Ok(Check::Pending)
        })
        .await
        .unwrap_err();

        match err {
            SmokeError::Timeout { locator, condition, waited } => {
                assert_eq!(locator, "testid=search-box");
                assert_eq!(condition, "visible");
                assert!(waited >= Duration::from_millis(30));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_probe_errors_are_not_retried() {
        let mut calls = 0;
        let err = poll_until::<(), _, _>("css=.x", "visible", Duration::from_secs(5), || {
            calls += 1;
            async { Err(SmokeError::Driver("tab crashed".to_string())) }
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "driver");
        assert_eq!(calls, 1);
    }
}
