//! User-facing reporting: progress lines, warnings and workflow outputs.
//!
//! When running inside GitHub Actions, warnings and errors are also emitted as
//! workflow commands so they show up as annotations on the run.

use colored::Colorize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Output key: whether the release produced any work.
pub const OUTPUT_DEPLOYMENT_REQUIRED: &str = "deployment-required";
/// Output key: name of the created plan.
pub const OUTPUT_PLAN: &str = "plan";

/// Sink for everything the workflow tells its caller.
pub trait Reporter {
    /// Progress or milestone message
    fn info(&self, message: &str);

    /// Non-fatal finding the caller should see
    fn warning(&self, message: &str);

    /// Publish a named workflow output
    fn set_output(&self, key: &str, value: &str) -> Result<()>;
}

/// Reporter that prints to the terminal and appends outputs to a file.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    output_file: Option<PathBuf>,
    annotations: bool,
}

impl ConsoleReporter {
    pub fn new(output_file: Option<PathBuf>, annotations: bool) -> Self {
        Self {
            output_file,
            annotations,
        }
    }

    /// Build a reporter from the GitHub Actions environment
    /// (`GITHUB_OUTPUT` and `GITHUB_ACTIONS`), with an optional explicit output file.
    pub fn from_env(output_file: Option<PathBuf>) -> Self {
        let output_file = output_file.or_else(|| {
            std::env::var_os("GITHUB_OUTPUT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        let annotations = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        Self::new(output_file, annotations)
    }

    /// Print a fatal error the way warnings are printed.
    pub fn error(&self, message: &str) {
        if self.annotations {
            println!("::error::{}", escape_workflow_data(message));
        }
        eprintln!("{} {}", "✗".red().bold(), message);
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{} {}", "→".blue(), message);
    }

    fn warning(&self, message: &str) {
        if self.annotations {
            println!("::warning::{}", escape_workflow_data(message));
        }
        eprintln!("{} {}", "⚠".yellow().bold(), message);
    }

    fn set_output(&self, key: &str, value: &str) -> Result<()> {
        println!("{} {key}={value}", "✓".green().bold());

        let Some(path) = &self.output_file else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::Output {
                path: path.display().to_string(),
                source,
            })?;
        writeln!(file, "{key}={value}").map_err(|source| Error::Output {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Escape a message for use as workflow command data.
pub fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
