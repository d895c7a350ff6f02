//! Deployment workflow: preview, create, check.
//!
//! A single driver covers both deployment styles. `allow_out_of_order` picks
//! lenient or strict preview validation and `check_policy` decides whether
//! checks run and how strict they are.

use tracing::info;

use crate::checks::{run_plan_checks, AggregateStatus, Poller, Sleeper, ThreadSleeper};
use crate::client::Transport;
use crate::config::DeployConfig;
use crate::error::Result;
use crate::plan::{create_plan, preview_plan, PreviewRequest};
use crate::report::{Reporter, OUTPUT_DEPLOYMENT_REQUIRED, OUTPUT_PLAN};

/// What a finished deployment produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// False when the release has nothing to apply to the targets
    pub deployment_required: bool,
    /// Name of the created plan
    pub plan: Option<String>,
    /// Final check counts, when checks ran
    pub checks: Option<AggregateStatus>,
}

pub struct Workflow<'a> {
    transport: &'a dyn Transport,
    reporter: &'a dyn Reporter,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Workflow<'a> {
    pub fn new(transport: &'a dyn Transport, reporter: &'a dyn Reporter) -> Self {
        Self {
            transport,
            reporter,
            sleeper: &ThreadSleeper,
        }
    }

    pub fn with_sleeper(mut self, sleeper: &'a dyn Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Turn the release into a plan and, unless the policy skips them, wait
    /// for its checks.
    ///
    /// A preview without any specs ends the run early with
    /// `deployment_required = false` and no plan is created.
    pub fn deploy(&self, config: &DeployConfig) -> Result<DeployOutcome> {
        let request = PreviewRequest {
            release: &config.release,
            targets: &config.targets,
            allow_out_of_order: config.allow_out_of_order,
        };
        let definition = preview_plan(self.transport, self.reporter, &config.project, &request)?;

        if definition.is_empty() {
            self.reporter.info("no deployment required");
            self.reporter.set_output(OUTPUT_DEPLOYMENT_REQUIRED, "false")?;
            return Ok(DeployOutcome {
                deployment_required: false,
                plan: None,
                checks: None,
            });
        }

        self.reporter.set_output(OUTPUT_DEPLOYMENT_REQUIRED, "true")?;
        let plan = create_plan(self.transport, &config.project, &definition)?;
        self.reporter.info(&format!(
            "created plan {plan} with {} specs",
            definition.spec_count()
        ));
        self.reporter.set_output(OUTPUT_PLAN, &plan)?;

        if !config.check_policy.runs_checks() {
            info!(plan = %plan, "plan checks skipped by policy");
            return Ok(DeployOutcome {
                deployment_required: true,
                plan: Some(plan),
                checks: None,
            });
        }

        let status = self.check(&plan, config)?;
        Ok(DeployOutcome {
            deployment_required: true,
            plan: Some(plan),
            checks: Some(status),
        })
    }

    fn check(&self, plan: &str, config: &DeployConfig) -> Result<AggregateStatus> {
        run_plan_checks(self.transport, plan)?;
        Poller::new(self.transport, self.reporter, config.poll.clone())
            .with_sleeper(self.sleeper)
            .wait(plan, config.check_policy.fail_on_warning())
    }
}
