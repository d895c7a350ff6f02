//! Paginated listing of plan check runs

use serde::Deserialize;
use tracing::debug;

use super::types::PlanCheckRun;
use crate::client::{ServiceRequest, Transport};
use crate::error::Result;

/// Largest page the service hands out.
pub const PAGE_SIZE: usize = 1000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPlanCheckRunsResponse {
    #[serde(default)]
    plan_check_runs: Vec<PlanCheckRun>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Fetch the latest run of every check of `plan_name`, across all pages.
///
/// Pages are concatenated in the order they arrive. Any failed page aborts the
/// whole listing; a partial result is never returned.
pub fn list_all_plan_check_runs(
    transport: &dyn Transport,
    plan_name: &str,
) -> Result<Vec<PlanCheckRun>> {
    let mut runs = Vec::new();
    let mut page_token = String::new();
    let mut pages = 0usize;

    loop {
        let request = ServiceRequest::get(format!("v1/{plan_name}/planCheckRuns"))
            .with_query("latestOnly", "true")
            .with_query("pageSize", PAGE_SIZE.to_string())
            .with_query("pageToken", page_token.as_str());

        let page: ListPlanCheckRunsResponse = transport
            .send(request)?
            .into_json("failed to list plan check runs")?;

        pages += 1;
        runs.extend(page.plan_check_runs);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = token,
            _ => break,
        }
    }

    debug!(plan = plan_name, pages, runs = runs.len(), "listed plan check runs");
    Ok(runs)
}
