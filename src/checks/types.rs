//! Plan check run types as reported by the change service

use serde::{Deserialize, Serialize};

/// Run-level status of a plan check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Done,
    Failed,
    Canceled,
    /// Anything the service reports that this client does not know
    #[default]
    #[serde(other)]
    Unrecognized,
}

/// Status of a single check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Success,
    Warning,
    Error,
    #[default]
    #[serde(other)]
    Other,
}

/// One finding of a completed check run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CheckResult {
    pub fn new(status: ResultStatus, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            content: String::new(),
        }
    }
}

/// Latest execution of one plan check
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanCheckRun {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: RunStatus,
    /// Only meaningful when `status` is `Done`
    #[serde(default)]
    pub results: Vec<CheckResult>,
}

impl PlanCheckRun {
    pub fn new(status: RunStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn done(results: Vec<CheckResult>) -> Self {
        Self {
            status: RunStatus::Done,
            results,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
