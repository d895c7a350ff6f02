//! Configuration for deployments and check polling.
//!
//! Settings come from command-line flags (or their environment variables)
//! layered over an optional TOML file. A layer only fills values the layer
//! above it left unset.
//!
//! ```toml
//! service-url = "https://bytebase.example.com"
//! project = "demo"
//! targets = ["instances/prod/databases/app"]
//! check-policy = "FAIL_ON_ERROR"
//! allow-out-of-order = false
//! poll-interval-ms = 5000
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::checks::PollConfig;
use crate::error::{Error, Result};
use crate::validation::{normalize_project, normalize_targets, validate_service_url};

/// Directory under the user config dir holding the default config file
pub const CONFIG_DIR_NAME: &str = "release-plan";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// How plan check findings affect the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckPolicy {
    /// Do not run plan checks at all
    Skip,
    /// Fail on warnings and anything worse
    FailOnWarning,
    /// Fail on errors only
    #[default]
    FailOnError,
}

impl CheckPolicy {
    pub fn runs_checks(&self) -> bool {
        !matches!(self, CheckPolicy::Skip)
    }

    pub fn fail_on_warning(&self) -> bool {
        matches!(self, CheckPolicy::FailOnWarning)
    }
}

impl fmt::Display for CheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckPolicy::Skip => write!(f, "SKIP"),
            CheckPolicy::FailOnWarning => write!(f, "FAIL_ON_WARNING"),
            CheckPolicy::FailOnError => write!(f, "FAIL_ON_ERROR"),
        }
    }
}

impl FromStr for CheckPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SKIP" => Ok(CheckPolicy::Skip),
            "FAIL_ON_WARNING" => Ok(CheckPolicy::FailOnWarning),
            "FAIL_ON_ERROR" => Ok(CheckPolicy::FailOnError),
            _ => Err(Error::configuration(format!(
                "unknown check policy '{s}'. Expected SKIP, FAIL_ON_WARNING or FAIL_ON_ERROR"
            ))),
        }
    }
}

/// Where and as whom to reach the change service
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub url: String,
    pub token: String,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Everything the deploy workflow needs besides the service connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Project resource name, `projects/<id>`
    pub project: String,
    pub release: String,
    pub targets: Vec<String>,
    pub allow_out_of_order: bool,
    pub check_policy: CheckPolicy,
    pub poll: PollConfig,
}

/// One source of settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigLayer {
    pub service_url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub release: Option<String>,
    pub targets: Option<Vec<String>>,
    pub check_policy: Option<String>,
    pub allow_out_of_order: Option<bool>,
    pub poll_interval_ms: Option<u64>,
    pub max_poll_cycles: Option<u32>,
    pub poll_timeout_secs: Option<u64>,
    pub output_file: Option<PathBuf>,
}

impl ConfigLayer {
    /// Parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::configuration(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Default config file location, whether or not it exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load `path` if given, otherwise the default file if it exists.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    /// Fill every unset value from `fallback`.
    pub fn or(self, fallback: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            service_url: self.service_url.or(fallback.service_url),
            token: self.token.or(fallback.token),
            project: self.project.or(fallback.project),
            release: self.release.or(fallback.release),
            targets: self.targets.or(fallback.targets),
            check_policy: self.check_policy.or(fallback.check_policy),
            allow_out_of_order: self.allow_out_of_order.or(fallback.allow_out_of_order),
            poll_interval_ms: self.poll_interval_ms.or(fallback.poll_interval_ms),
            max_poll_cycles: self.max_poll_cycles.or(fallback.max_poll_cycles),
            poll_timeout_secs: self.poll_timeout_secs.or(fallback.poll_timeout_secs),
            output_file: self.output_file.or(fallback.output_file),
        }
    }

    pub fn resolve_service(&self) -> Result<ServiceConfig> {
        let url = require(&self.service_url, "service-url")?;
        let token = require(&self.token, "token")?;
        Ok(ServiceConfig {
            url: validate_service_url(url)?,
            token: token.to_string(),
        })
    }

    /// Check policy, defaulting to fail-on-error.
    pub fn resolve_policy(&self) -> Result<CheckPolicy> {
        self.check_policy
            .as_deref()
            .map(CheckPolicy::from_str)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn resolve_poll(&self) -> Result<PollConfig> {
        let mut poll = PollConfig::default();
        if let Some(ms) = self.poll_interval_ms {
            if ms == 0 {
                return Err(Error::configuration("poll-interval-ms must be positive"));
            }
            poll.poll_interval = Duration::from_millis(ms);
        }
        poll.max_cycles = self.max_poll_cycles.filter(|cycles| *cycles > 0);
        poll.max_duration = self
            .poll_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Ok(poll)
    }

    pub fn resolve_deploy(&self) -> Result<DeployConfig> {
        // Policy first: an unknown value must fail before anything else is looked at.
        let check_policy = self.resolve_policy()?;
        let project = normalize_project(require(&self.project, "project")?)?;
        let release = require(&self.release, "release")?.trim().to_string();
        if release.is_empty() {
            return Err(Error::configuration("release cannot be empty"));
        }
        let targets = normalize_targets(self.targets.iter().flatten())?;

        Ok(DeployConfig {
            project,
            release,
            targets,
            allow_out_of_order: self.allow_out_of_order.unwrap_or(false),
            check_policy,
            poll: self.resolve_poll()?,
        })
    }
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::configuration(format!("{name} is required")))
}
