//! Assertion primitives shared by the page objects

use crate::error::{Result, SmokeError};

pub fn assert_true(check: &str, condition: bool) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SmokeError::assertion(check, true, false))
    }
}

pub fn assert_equal<T>(check: &str, expected: T, actual: T) -> Result<()>
where
    T: PartialEq + std::fmt::Display,
{
    if expected == actual {
        Ok(())
    } else {
        Err(SmokeError::assertion(check, expected, actual))
    }
}

pub fn assert_contains(check: &str, needle: &str, haystack: &str) -> Result<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(SmokeError::assertion(check, format!("text containing {:?}", needle), format!("{:?}", haystack)))
    }
}

pub fn assert_contains_ignore_case(check: &str, needle: &str, haystack: &str) -> Result<()> {
    if haystack.to_lowercase().contains(&needle.to_lowercase()) {
        Ok(())
    } else {
        Err(SmokeError::assertion(check, format!("text containing {:?}", needle), format!("{:?}", haystack)))
    }
}
