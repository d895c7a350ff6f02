//! Plan preview and materialization
//!
//! A plan definition is produced by the change service and handed back to it
//! unchanged. This crate only looks at how many steps and specs it holds.

mod create;
mod preview;

pub use create::create_plan;
pub use preview::{preview_plan, PreviewRequest};

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{Error, Result};

/// Files of one database that fall into a preview classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseFiles {
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub files: Vec<String>,
}

impl DatabaseFiles {
    pub fn new(database: impl Into<String>, files: &[&str]) -> Self {
        Self {
            database: database.into(),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Render classified files as one `database: file,file` line per database.
pub fn format_database_files(database_files: &[DatabaseFiles]) -> String {
    database_files
        .iter()
        .map(|entry| format!("{}: {}", entry.database, entry.files.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Narrow view of a plan used only for counting
#[derive(Deserialize)]
struct PlanShape {
    #[serde(default)]
    steps: Vec<StepShape>,
}

#[derive(Deserialize)]
struct StepShape {
    #[serde(default)]
    specs: Vec<IgnoredAny>,
}

/// A plan document as returned by preview.
///
/// The original JSON text is kept and re-submitted byte-for-byte; the number
/// of specs in every step is read once when the definition is built.
#[derive(Debug, Clone)]
pub struct PlanDefinition {
    raw: Box<RawValue>,
    step_specs: Vec<usize>,
}

impl PlanDefinition {
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self> {
        let shape: PlanShape = serde_json::from_str(raw.get()).map_err(|source| Error::Decode {
            context: "plan definition".to_string(),
            source,
        })?;
        let step_specs = shape.steps.iter().map(|step| step.specs.len()).collect();
        Ok(Self { raw, step_specs })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw = RawValue::from_string(json.to_string()).map_err(|source| Error::Decode {
            context: "plan definition".to_string(),
            source,
        })?;
        Self::from_raw(raw)
    }

    /// The plan exactly as the service sent it.
    pub fn as_json(&self) -> &str {
        self.raw.get()
    }

    pub fn step_count(&self) -> usize {
        self.step_specs.len()
    }

    /// Total number of specs across all steps.
    pub fn spec_count(&self) -> usize {
        self.step_specs.iter().sum()
    }

    /// A plan without specs has nothing to deploy.
    pub fn is_empty(&self) -> bool {
        self.spec_count() == 0
    }
}
