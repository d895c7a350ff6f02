//! Poll loop that waits for plan checks to settle

use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::aggregate::{aggregate, AggregateStatus, CheckFailureKind};
use super::runs::list_all_plan_check_runs;
use super::types::{PlanCheckRun, ResultStatus, RunStatus};
use crate::client::Transport;
use crate::error::{Error, Result};
use crate::report::Reporter;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling cadence and optional bounds.
///
/// Without bounds the poller waits for as long as the service keeps any run
/// in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub poll_interval: Duration,
    pub max_cycles: Option<u32>,
    pub max_duration: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_cycles: None,
            max_duration: None,
        }
    }
}

/// Suspends the poll loop between cycles
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Waits on the plan checks of one plan
pub struct Poller<'a> {
    transport: &'a dyn Transport,
    reporter: &'a dyn Reporter,
    sleeper: &'a dyn Sleeper,
    config: PollConfig,
}

impl<'a> Poller<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        reporter: &'a dyn Reporter,
        config: PollConfig,
    ) -> Self {
        Self {
            transport,
            reporter,
            sleeper: &ThreadSleeper,
            config,
        }
    }

    pub fn with_sleeper(mut self, sleeper: &'a dyn Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Poll until no run of `plan_name` is in progress.
    ///
    /// Every cycle refetches all runs and re-aggregates them. A failed or
    /// canceled run, an error result, or (with `fail_on_warning`) a warning
    /// result ends the wait with [`Error::CheckFailure`], even while other
    /// runs are still in progress.
    pub fn wait(&self, plan_name: &str, fail_on_warning: bool) -> Result<AggregateStatus> {
        let started = Instant::now();
        let mut cycle: u32 = 0;

        loop {
            cycle += 1;
            let runs = list_all_plan_check_runs(self.transport, plan_name)?;
            let status = aggregate(&runs);
            debug!(plan = plan_name, cycle, ?status, "polled plan checks");
            self.reporter
                .info(&format!("plan checks for {plan_name}: {status}"));

            if let Some(kind) = status.verdict(fail_on_warning) {
                if kind.is_result_failure() {
                    self.report_findings(&runs, kind);
                }
                return Err(Error::CheckFailure { kind, status });
            }

            if status.is_settled() {
                info!(plan = plan_name, cycles = cycle, "plan checks settled");
                return Ok(status);
            }

            let cycles_exhausted = self.config.max_cycles.is_some_and(|max| cycle >= max);
            let time_exhausted = self
                .config
                .max_duration
                .is_some_and(|max| started.elapsed() >= max);
            if cycles_exhausted || time_exhausted {
                return Err(Error::CheckFailure {
                    kind: CheckFailureKind::Timeout { cycles: cycle },
                    status,
                });
            }

            self.sleeper.sleep(self.config.poll_interval);
        }
    }

    /// List the results behind a result-level failure.
    fn report_findings(&self, runs: &[PlanCheckRun], kind: CheckFailureKind) {
        let mut findings = Vec::new();
        for run in runs.iter().filter(|run| run.status == RunStatus::Done) {
            for result in &run.results {
                let wanted = match kind {
                    CheckFailureKind::WarningResults => {
                        matches!(result.status, ResultStatus::Warning | ResultStatus::Error)
                    }
                    _ => result.status == ResultStatus::Error,
                };
                if wanted {
                    findings.push(format_finding(
                        &run.name,
                        result.status,
                        &result.title,
                        &result.content,
                    ));
                }
            }
        }

        if !findings.is_empty() {
            self.reporter.warning(&findings.join("\n"));
        }
    }
}

fn format_finding(run: &str, status: ResultStatus, title: &str, content: &str) -> String {
    let severity = match status {
        ResultStatus::Error => "ERROR",
        ResultStatus::Warning => "WARNING",
        ResultStatus::Success => "SUCCESS",
        ResultStatus::Other => "UNKNOWN",
    };
    let mut line = format!("[{severity}] {title}");
    if !content.is_empty() {
        line.push_str(": ");
        line.push_str(content);
    }
    if !run.is_empty() {
        line.push_str(&format!(" ({run})"));
    }
    line
}
