//! Input validation for caller-supplied configuration.
//!
//! Everything here runs before the first request is sent, so a bad input
//! never reaches the change service.

use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Resource id segment: no slashes, no whitespace.
static RESOURCE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/\s]+$").expect("Invalid regex pattern"));

static PLAN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^projects/[^/\s]+/plans/[^/\s]+$").expect("Invalid regex pattern")
});

/// Normalize a project to its resource name.
///
/// Accepts either `demo` or `projects/demo` and returns `projects/demo`.
///
/// # Examples
///
/// ```
/// use release_plan::validation::normalize_project;
///
/// assert_eq!(normalize_project("demo").unwrap(), "projects/demo");
/// assert_eq!(normalize_project("projects/demo").unwrap(), "projects/demo");
/// assert!(normalize_project("projects/").is_err());
/// ```
pub fn normalize_project(project: &str) -> Result<String> {
    let project = project.trim();
    let id = project.strip_prefix("projects/").unwrap_or(project);

    if id.is_empty() {
        return Err(Error::configuration("project cannot be empty"));
    }
    if !RESOURCE_ID.is_match(id) {
        return Err(Error::configuration(format!(
            "project '{project}' is not a valid project id or resource name"
        )));
    }

    Ok(format!("projects/{id}"))
}

/// Validate a plan resource name such as `projects/demo/plans/42`.
pub fn validate_plan_name(name: &str) -> Result<()> {
    if !PLAN_NAME.is_match(name) {
        return Err(Error::configuration(format!(
            "plan '{name}' is not a plan resource name (projects/<project>/plans/<id>)"
        )));
    }
    Ok(())
}

/// Validate the service base URL and strip trailing slashes.
pub fn validate_service_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::configuration("service URL cannot be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| Error::configuration(format!("service URL '{trimmed}' is invalid: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "service URL '{trimmed}' must use http or https"
        )));
    }

    Ok(trimmed.to_string())
}

/// Clean up a target list: trim entries, drop blanks and duplicates.
///
/// The first occurrence of each target keeps its position.
pub fn normalize_targets<I, S>(targets: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for target in targets {
        let target = target.as_ref().trim();
        if !target.is_empty() && !normalized.iter().any(|t| t == target) {
            normalized.push(target.to_string());
        }
    }

    if normalized.is_empty() {
        return Err(Error::configuration("at least one target is required"));
    }
    Ok(normalized)
}

/// Clap value parser for plan name arguments.
pub fn clap_plan_name_validator(s: &str) -> std::result::Result<String, String> {
    validate_plan_name(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for the service URL.
pub fn clap_url_validator(s: &str) -> std::result::Result<String, String> {
    validate_service_url(s).map_err(|e| e.to_string())
}
