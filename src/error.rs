//! Error types for the smoke suite
//!
//! Every failure aborts the running scenario. Messages carry the context a
//! reader of the report needs: the locator and condition for timeouts, the raw
//! text for format errors, expected vs actual for assertions.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, SmokeError>;

#[derive(Error, Debug)]
pub enum SmokeError {
    /// A required environment value is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An awaited UI condition did not become true within its budget
    #[error("Timed out after {waited:?} waiting for {locator} to be {condition}")]
    Timeout {
        locator: String,
        condition: String,
        waited: Duration,
    },

    /// Extracted text does not match its canonical pattern
    #[error("Unexpected {what} format: {raw:?}")]
    Format { what: &'static str, raw: String },

    /// A computed value failed a comparison
    #[error("Assertion failed ({check}): expected {expected}, actual {actual}")]
    Assertion {
        check: String,
        expected: String,
        actual: String,
    },

    /// The automation engine itself failed
    #[error("Browser error: {0}")]
    Driver(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SmokeError {
    /// Build a format error from the offending text
    pub fn format(what: &'static str, raw: impl Into<String>) -> Self {
        Self::Format {
            what,
            raw: raw.into(),
        }
    }

    /// Build an assertion error
    pub fn assertion(
        check: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::Assertion {
            check: check.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Wrap an engine failure with the operation that caused it
    pub fn driver(action: &str, err: impl std::fmt::Display) -> Self {
        Self::Driver(format!("{}: {}", action, err))
    }

    /// Short stable label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Timeout { .. } => "timeout",
            Self::Format { .. } => "format",
            Self::Assertion { .. } => "assertion",
            Self::Driver(_) => "driver",
            Self::Io(_) | Self::Json(_) => "report",
        }
    }
}
