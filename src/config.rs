//! Suite configuration loaded from the environment

use crate::error::{Result, SmokeError};
use crate::models::Credentials;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.funda.nl/";
pub const DEFAULT_ACCOUNT_LABEL: &str = "Mijn account";
pub const DEFAULT_REPORT_DIR: &str = "smoke-report";

/// Budget for interactive elements (buttons, inputs, labels)
pub const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(15);
/// Budget for a result set to render after a search, filter or sort
pub const RESULT_SET_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT_VAR: &str = "FUNDA_USER_AGENT";
const BASE_URL_VAR: &str = "FUNDA_BASE_URL";
const HEADLESS_VAR: &str = "FUNDA_HEADLESS";
const EMAIL_VAR: &str = "FUNDA_EMAIL";
const PASSWORD_VAR: &str = "FUNDA_PASSWORD";
const ACCOUNT_LABEL_VAR: &str = "FUNDA_ACCOUNT_LABEL";
const REPORT_DIR_VAR: &str = "FUNDA_REPORT_DIR";

/// Everything a suite run needs before the browser starts
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Landing page URL
    pub base_url: String,
    /// User agent every browser context presents
    pub user_agent: String,
    /// Run Chrome without a window
    pub headless: bool,
    /// Browser viewport (width, height)
    pub viewport: (u32, u32),
    /// Login credentials, only needed by the login scenario
    pub credentials: Option<Credentials>,
    /// Header label shown while logged in
    pub account_label: String,
    /// Where step logs and screenshots are written
    pub report_dir: PathBuf,
    pub interactive_timeout: Duration,
    pub result_set_timeout: Duration,
}

impl SuiteConfig {
    /// Load configuration from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as missing
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let user_agent = get(USER_AGENT_VAR).ok_or_else(|| {
            SmokeError::Configuration(format!("{} environment variable is not set", USER_AGENT_VAR))
        })?;

        let headless = match get(HEADLESS_VAR) {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                SmokeError::Configuration(format!("{} must be true or false, got {:?}", HEADLESS_VAR, raw))
            })?,
        };

        let credentials = match (get(EMAIL_VAR), get(PASSWORD_VAR)) {
            (Some(email), Some(password)) => Some(Credentials { email, password }),
            _ => None,
        };

        Ok(Self {
            base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent,
            headless,
            viewport: (1920, 1080),
            credentials,
            account_label: get(ACCOUNT_LABEL_VAR).unwrap_or_else(|| DEFAULT_ACCOUNT_LABEL.to_string()),
            report_dir: get(REPORT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR)),
            interactive_timeout: INTERACTIVE_TIMEOUT,
            result_set_timeout: RESULT_SET_TIMEOUT,
        })
    }

    /// Credentials for the login scenario
    pub fn require_credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            SmokeError::Configuration(format!(
                "{} and {} must be set to run the login scenario",
                EMAIL_VAR, PASSWORD_VAR
            ))
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
