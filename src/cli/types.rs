use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use release_plan::config::ConfigLayer;
use release_plan::validation::{clap_plan_name_validator, clap_url_validator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "release-plan")]
#[command(about = "Turn a database release into a change plan and wait for its checks", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Path to a TOML config file
    /// (default: <config dir>/release-plan/config.toml when present)
    #[arg(long, global = true, env = "RELEASE_PLAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Preview a release, create its plan and wait for plan checks
    Deploy(DeployArgs),

    /// Run and/or wait for the checks of an existing plan
    Check(CheckArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Connection to the change service
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Base URL of the change service
    #[arg(long = "url", env = "RELEASE_PLAN_URL", value_parser = clap_url_validator)]
    pub url: Option<String>,

    /// Bearer token used to authenticate
    #[arg(long, env = "RELEASE_PLAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Check policy and polling behavior
#[derive(Args, Debug, Clone, Default)]
pub struct PollArgs {
    /// SKIP, FAIL_ON_WARNING or FAIL_ON_ERROR (default)
    #[arg(long, env = "RELEASE_PLAN_CHECK_POLICY")]
    pub check_policy: Option<String>,

    /// Delay between plan check polls in milliseconds (default: 5000)
    #[arg(long, env = "RELEASE_PLAN_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Give up after this many poll cycles (default: unbounded)
    #[arg(long, env = "RELEASE_PLAN_MAX_POLL_CYCLES")]
    pub max_poll_cycles: Option<u32>,

    /// Give up after polling for this many seconds (default: unbounded)
    #[arg(long, env = "RELEASE_PLAN_POLL_TIMEOUT_SECS")]
    pub poll_timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Project id or resource name (projects/<id>)
    #[arg(long, env = "RELEASE_PLAN_PROJECT")]
    pub project: Option<String>,

    /// Release resource name
    #[arg(long, env = "RELEASE_PLAN_RELEASE")]
    pub release: Option<String>,

    /// Comma-separated target databases
    #[arg(long, env = "RELEASE_PLAN_TARGETS", value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Only warn about out-of-order files instead of failing
    #[arg(
        long,
        env = "RELEASE_PLAN_ALLOW_OUT_OF_ORDER",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub allow_out_of_order: Option<bool>,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Append outputs as key=value lines to this file (default: $GITHUB_OUTPUT)
    #[arg(long, env = "RELEASE_PLAN_OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Plan resource name (projects/<id>/plans/<id>)
    #[arg(long, value_parser = clap_plan_name_validator)]
    pub plan: String,

    /// Only wait for checks that are already running
    #[arg(long)]
    pub no_trigger: bool,

    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub poll: PollArgs,
}

impl ServiceArgs {
    fn apply(&self, layer: &mut ConfigLayer) {
        layer.service_url = self.url.clone();
        layer.token = self.token.clone();
    }
}

impl PollArgs {
    fn apply(&self, layer: &mut ConfigLayer) {
        layer.check_policy = self.check_policy.clone();
        layer.poll_interval_ms = self.poll_interval_ms;
        layer.max_poll_cycles = self.max_poll_cycles;
        layer.poll_timeout_secs = self.poll_timeout_secs;
    }
}

impl DeployArgs {
    /// Settings given on the command line or through the environment.
    pub fn layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer {
            project: self.project.clone(),
            release: self.release.clone(),
            targets: (!self.targets.is_empty()).then(|| self.targets.clone()),
            allow_out_of_order: self.allow_out_of_order,
            output_file: self.output_file.clone(),
            ..Default::default()
        };
        self.service.apply(&mut layer);
        self.poll.apply(&mut layer);
        layer
    }
}

impl CheckArgs {
    pub fn layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        self.service.apply(&mut layer);
        self.poll.apply(&mut layer);
        layer
    }
}
