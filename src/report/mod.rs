//! Step log and screenshot attachments per scenario
//!
//! Each scenario gets its own directory under the report root holding
//! `report.json` and the PNGs attached during the run. Steps nest; a step
//! is always closed before its error propagates.

use crate::driver::PageDriver;
use crate::error::{Result, SmokeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Path relative to the scenario directory
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: Status,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub steps: Vec<StepRecord>,
}

impl StepRecord {
    fn open(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: Status::Running,
            started_at: Utc::now(),
            finished_at: None,
            error: None,
            attachments: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Final record written to `report.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub status: Status,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug)]
struct State {
    open: Vec<StepRecord>,
    done: Vec<StepRecord>,
    loose_attachments: Vec<Attachment>,
    next_attachment: usize,
}

pub struct Reporter {
    scenario: String,
    dir: PathBuf,
    started_at: DateTime<Utc>,
    state: Mutex<State>,
}

impl Reporter {
    /// Create `<root>/<scenario>/` and start recording
    pub fn new(root: &Path, scenario: &str) -> Result<Self> {
        let dir = root.join(scenario);
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            scenario: scenario.to_string(),
            dir,
            started_at: Utc::now(),
            state: Mutex::new(State {
                open: Vec::new(),
                done: Vec::new(),
                loose_attachments: Vec::new(),
                next_attachment: 1,
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic elsewhere must not hide the report
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn start_step(&self, name: &str) {
        info!("▶ {}", name);
        self.state().open.push(StepRecord::open(name));
    }

    /// Close the innermost open step, failed if `error` is given
    pub fn stop_step(&self, error: Option<&SmokeError>) {
        let mut state = self.state();
        let Some(mut step) = state.open.pop() else {
            warn!("stop_step called with no open step");
            return;
        };

        step.finished_at = Some(Utc::now());
        match error {
            None => step.status = Status::Passed,
            Some(err) => {
                step.status = Status::Failed;
                step.error = Some(err.to_string());
                warn!("✗ {}: {}", step.name, err);
            }
        }

        match state.open.last_mut() {
            Some(parent) => parent.steps.push(step),
            None => state.done.push(step),
        }
    }

    /// Run `action` as a named step
    pub async fn step<T, F>(&self, name: &str, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.start_step(name);
        let outcome = action.await;
        self.stop_step(outcome.as_ref().err());
        outcome
    }

    /// Write `png` next to the report and attach it to the open step
    pub fn attach_image(&self, name: &str, png: &[u8]) -> Result<PathBuf> {
        let mut state = self.state();
        let file = format!("{:02}-{}.png", state.next_attachment, file_stem(name));
        state.next_attachment += 1;

        let path = self.dir.join(&file);
        std::fs::write(&path, png)?;
        info!("Attached {} ({} bytes)", file, png.len());

        let attachment = Attachment {
            name: name.to_string(),
            file,
        };
        match state.open.last_mut() {
            Some(step) => step.attachments.push(attachment),
            None => state.loose_attachments.push(attachment),
        }
        Ok(path)
    }

    /// Capture the page and attach it
    pub async fn screenshot(&self, driver: &dyn PageDriver, name: &str) -> Result<()> {
        let png = driver.screenshot().await?;
        self.attach_image(name, &png)?;
        Ok(())
    }

    /// Close any dangling steps and write `report.json`
    pub fn finish(self, outcome: &Result<()>) -> Result<ScenarioReport> {
        while !self.state().open.is_empty() {
            self.stop_step(outcome.as_ref().err());
        }

        let state = self.state.into_inner().unwrap_or_else(|e| e.into_inner());
        let (status, error_kind, error) = match outcome {
            Ok(()) => (Status::Passed, None, None),
            Err(err) => (Status::Failed, Some(err.kind().to_string()), Some(err.to_string())),
        };

        let report = ScenarioReport {
            scenario: self.scenario,
            status,
            started_at: self.started_at,
            finished_at: Utc::now(),
            error_kind,
            error,
            steps: state.done,
            attachments: state.loose_attachments,
        };

        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(self.dir.join("report.json"), json)?;
        info!("💾 Saved report to {}", self.dir.join("report.json").display());

        Ok(report)
    }
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    stem.split('-').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("LandingPage-header Screenshot"), "landingpage-header-screenshot");
        assert_eq!(file_stem("  ??  "), "");
    }

    #[tokio::test]
    async fn test_failed_step_is_closed_before_error_propagates() {
        let root = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(root.path(), "search").unwrap();

        reporter.step("Navigate", async { Ok(()) }).await.unwrap();
        let outcome: Result<()> = reporter
            .step("Verify price", async { Err(SmokeError::format("price", "€ abc")) })
            .await;
        assert!(outcome.is_err());

        let report = reporter.finish(&outcome).unwrap();
        assert_eq!(report.status, Status::Failed);
        assert_eq!(report.error_kind.as_deref(), Some("format"));
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].status, Status::Passed);
        assert_eq!(report.steps[1].status, Status::Failed);
        assert!(report.steps[1].finished_at.is_some());
        assert!(report.steps[1].error.as_deref().unwrap().contains("€ abc"));

        let written = std::fs::read_to_string(root.path().join("search/report.json")).unwrap();
        let parsed: ScenarioReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.steps.len(), 2);
    }

    #[test]
    fn test_attachments_land_in_open_step() {
        let root = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(root.path(), "landing-page").unwrap();

        reporter.start_step("Header");
        let path = reporter.attach_image("Header Screenshot", b"\x89PNG").unwrap();
        reporter.stop_step(None);
        reporter.attach_image("After", b"\x89PNG").unwrap();

        assert_eq!(path.file_name().unwrap(), "01-header-screenshot.png");
        assert!(path.exists());

        let report = reporter.finish(&Ok(())).unwrap();
        assert_eq!(report.status, Status::Passed);
        assert_eq!(report.steps[0].attachments.len(), 1);
        assert_eq!(report.attachments[0].file, "02-after.png");
    }

    #[test]
    fn test_nested_steps_and_dangling_steps() {
        let root = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(root.path(), "nested").unwrap();

        reporter.start_step("Outer");
        reporter.start_step("Inner");
        reporter.stop_step(None);
        reporter.start_step("Never stopped");

        let outcome = Err(SmokeError::Driver("tab crashed".to_string()));
        let report = reporter.finish(&outcome).unwrap();

        assert_eq!(report.steps.len(), 1);
        let outer = &report.steps[0];
        assert_eq!(outer.status, Status::Failed);
        assert_eq!(outer.steps.len(), 2);
        assert_eq!(outer.steps[0].status, Status::Passed);
        assert_eq!(outer.steps[1].status, Status::Failed);
    }
}
