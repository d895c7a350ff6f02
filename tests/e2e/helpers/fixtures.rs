//! Canned payloads and collaborators shared by the E2E tests

use release_plan::checks::{PlanCheckRun, Sleeper};
use release_plan::report::Reporter;
use std::sync::Mutex;
use std::time::Duration;

/// Body of a successful `previewPlan` answer.
pub fn preview_response(plan: &str, out_of_order: &str, modified: &str) -> String {
    format!(
        r#"{{"message":"","plan":{plan},"outOfOrderFiles":{out_of_order},"appliedButModifiedFiles":{modified}}}"#
    )
}

/// Body of a successful plan creation.
pub fn created_plan(name: &str) -> String {
    format!(r#"{{"message":"","name":"{name}"}}"#)
}

/// Body of one page of plan check runs.
pub fn runs_page(runs: &[PlanCheckRun], next_page_token: &str) -> String {
    serde_json::json!({
        "planCheckRuns": runs,
        "nextPageToken": next_page_token,
    })
    .to_string()
}

/// Reporter that keeps what it is told
#[derive(Default)]
pub struct RecordingReporter {
    pub infos: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub outputs: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn output(&self, key: &str) -> Option<String> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn set_output(&self, key: &str, value: &str) -> release_plan::Result<()> {
        self.outputs
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Sleeper that returns immediately
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}
