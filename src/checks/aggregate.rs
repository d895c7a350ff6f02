//! Aggregation of plan check runs into a single verdict

use super::types::{PlanCheckRun, ResultStatus, RunStatus};

/// Counts over one complete set of plan check runs.
///
/// `warning` and `error` count results of `Done` runs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStatus {
    pub running: usize,
    pub done: usize,
    pub failed: usize,
    pub canceled: usize,
    pub warning: usize,
    pub error: usize,
}

impl AggregateStatus {
    /// No run is still in progress.
    pub fn is_settled(&self) -> bool {
        self.running == 0
    }

    /// First disqualifying condition, checked in fixed precedence order:
    /// failed run, canceled run, error result, then warning result when
    /// `fail_on_warning` is set.
    pub fn verdict(&self, fail_on_warning: bool) -> Option<CheckFailureKind> {
        if self.failed > 0 {
            Some(CheckFailureKind::FailedRun)
        } else if self.canceled > 0 {
            Some(CheckFailureKind::CanceledRun)
        } else if self.error > 0 {
            Some(CheckFailureKind::ErrorResults)
        } else if fail_on_warning && self.warning > 0 {
            Some(CheckFailureKind::WarningResults)
        } else {
            None
        }
    }
}

impl std::fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} running, {} done, {} failed, {} canceled ({} warnings, {} errors)",
            self.running, self.done, self.failed, self.canceled, self.warning, self.error
        )
    }
}

/// Why plan checks disqualified a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFailureKind {
    FailedRun,
    CanceledRun,
    ErrorResults,
    WarningResults,
    /// Runs were still in progress when the polling bound ran out
    Timeout { cycles: u32 },
}

impl CheckFailureKind {
    /// The failure is caused by check findings rather than run state.
    pub fn is_result_failure(&self) -> bool {
        matches!(
            self,
            CheckFailureKind::ErrorResults | CheckFailureKind::WarningResults
        )
    }
}

impl std::fmt::Display for CheckFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckFailureKind::FailedRun => write!(f, "failed plan check run"),
            CheckFailureKind::CanceledRun => write!(f, "canceled plan check run"),
            CheckFailureKind::ErrorResults => write!(f, "plan checks report errors"),
            CheckFailureKind::WarningResults => write!(f, "plan checks report warnings"),
            CheckFailureKind::Timeout { cycles } => {
                write!(f, "plan checks did not settle after {cycles} poll cycles")
            }
        }
    }
}

/// Count runs by status and, for done runs, results by severity.
///
/// Statuses outside the known set are left uncounted.
pub fn aggregate(runs: &[PlanCheckRun]) -> AggregateStatus {
    let mut status = AggregateStatus::default();

    for run in runs {
        match run.status {
            RunStatus::Running => status.running += 1,
            RunStatus::Failed => status.failed += 1,
            RunStatus::Canceled => status.canceled += 1,
            RunStatus::Done => {
                status.done += 1;
                for result in &run.results {
                    match result.status {
                        ResultStatus::Warning => status.warning += 1,
                        ResultStatus::Error => status.error += 1,
                        ResultStatus::Success | ResultStatus::Other => {}
                    }
                }
            }
            RunStatus::Unrecognized => {}
        }
    }

    status
}
