//! Plan preview with out-of-order validation

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, info};

use super::{format_database_files, DatabaseFiles, PlanDefinition};
use crate::client::{ServiceRequest, Transport};
use crate::error::{Error, Result};
use crate::report::Reporter;

const PREVIEW_CONTEXT: &str = "failed to preview plan";

/// Body of a `previewPlan` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest<'a> {
    pub release: &'a str,
    pub targets: &'a [String],
    pub allow_out_of_order: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    #[serde(default)]
    plan: Option<Box<RawValue>>,
    #[serde(default)]
    out_of_order_files: Option<Vec<DatabaseFiles>>,
    #[serde(default)]
    applied_but_modified_files: Option<Vec<DatabaseFiles>>,
}

/// Preview the plan that applying `release` to `targets` would produce.
///
/// Non-empty classifications are reported as warnings, one per category.
/// With `allow_out_of_order` unset, any out-of-order file fails the preview
/// with [`Error::Validation`] after the warnings have been emitted.
/// Applied-but-modified files are never fatal.
pub fn preview_plan(
    transport: &dyn Transport,
    reporter: &dyn Reporter,
    project: &str,
    request: &PreviewRequest<'_>,
) -> Result<PlanDefinition> {
    let body = serde_json::to_string(request).map_err(|source| Error::Decode {
        context: "preview request".to_string(),
        source,
    })?;

    info!(
        release = request.release,
        targets = request.targets.len(),
        allow_out_of_order = request.allow_out_of_order,
        "previewing plan"
    );
    let response: PreviewResponse = transport
        .send(ServiceRequest::post(
            format!("v1/{project}:previewPlan"),
            body,
        ))?
        .into_json(PREVIEW_CONTEXT)?;

    let out_of_order = response.out_of_order_files.unwrap_or_default();
    let applied_but_modified = response.applied_but_modified_files.unwrap_or_default();

    if !out_of_order.is_empty() {
        reporter.warning(&format!(
            "found out of order files\n{}",
            format_database_files(&out_of_order)
        ));
    }
    if !applied_but_modified.is_empty() {
        reporter.warning(&format!(
            "found applied but modified files\n{}",
            format_database_files(&applied_but_modified)
        ));
    }

    if !request.allow_out_of_order && !out_of_order.is_empty() {
        return Err(Error::Validation {
            files: out_of_order,
        });
    }

    let raw = response.plan.ok_or_else(|| Error::Service {
        context: PREVIEW_CONTEXT.to_string(),
        status: crate::client::STATUS_OK,
        message: "response has no plan".to_string(),
    })?;
    let plan = PlanDefinition::from_raw(raw)?;
    debug!(
        steps = plan.step_count(),
        specs = plan.spec_count(),
        "plan previewed"
    );
    Ok(plan)
}
