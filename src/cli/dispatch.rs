use anyhow::{Context, Result};
use clap::CommandFactory;
use release_plan::checks::{run_plan_checks, Poller};
use release_plan::client::HttpTransport;
use release_plan::config::ConfigLayer;
use release_plan::report::{ConsoleReporter, Reporter};
use release_plan::workflow::Workflow;
use std::io;
use std::path::Path;
use tracing::info;

use super::types::{CheckArgs, Cli, Commands, DeployArgs};

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy(args) => deploy(cli.config.as_deref(), &args),
        Commands::Check(args) => check(cli.config.as_deref(), &args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "release-plan", &mut io::stdout());
            Ok(())
        }
    }
}

fn deploy(config_path: Option<&Path>, args: &DeployArgs) -> Result<()> {
    let layer = args.layer().or(ConfigLayer::discover(config_path)?);
    let deploy = layer.resolve_deploy()?;
    let service = layer.resolve_service()?;

    let reporter = ConsoleReporter::from_env(layer.output_file.clone());
    let transport = HttpTransport::new(&service.url, &service.token)?;

    info!(
        project = %deploy.project,
        release = %deploy.release,
        policy = %deploy.check_policy,
        "starting deployment"
    );
    let outcome = Workflow::new(&transport, &reporter)
        .deploy(&deploy)
        .with_context(|| format!("deployment of {} failed", deploy.release))?;

    if let Some(checks) = outcome.checks {
        reporter.info(&format!("plan checks passed: {checks}"));
    }
    Ok(())
}

fn check(config_path: Option<&Path>, args: &CheckArgs) -> Result<()> {
    let layer = args.layer().or(ConfigLayer::discover(config_path)?);
    let policy = layer.resolve_policy()?;
    let poll = layer.resolve_poll()?;
    let service = layer.resolve_service()?;

    let reporter = ConsoleReporter::from_env(None);
    let transport = HttpTransport::new(&service.url, &service.token)?;

    if !args.no_trigger {
        run_plan_checks(&transport, &args.plan)
            .with_context(|| format!("failed to start checks for {}", args.plan))?;
    }
    if !policy.runs_checks() {
        reporter.info("check policy is SKIP, not waiting for plan checks");
        return Ok(());
    }

    let status = Poller::new(&transport, &reporter, poll)
        .wait(&args.plan, policy.fail_on_warning())
        .with_context(|| format!("plan checks for {} failed", args.plan))?;
    reporter.info(&format!("plan checks passed: {status}"));
    Ok(())
}
