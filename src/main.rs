mod cli;

use clap::Parser;
use release_plan::report::ConsoleReporter;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{dispatch, Cli};

/// Environment variable holding the log filter (e.g. `release_plan=debug`)
const LOG_ENV: &str = "RELEASE_PLAN_LOG";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ConsoleReporter::from_env(None).error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
