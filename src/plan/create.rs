//! Plan materialization

use serde::Deserialize;
use tracing::info;

use super::PlanDefinition;
use crate::client::{ServiceRequest, Transport, STATUS_OK};
use crate::error::{Error, Result};

const CREATE_CONTEXT: &str = "failed to create plan";

#[derive(Deserialize)]
struct CreatePlanResponse {
    #[serde(default)]
    name: String,
}

/// Persist a previewed plan under `project` and return its server-assigned name.
pub fn create_plan(
    transport: &dyn Transport,
    project: &str,
    plan: &PlanDefinition,
) -> Result<String> {
    let response: CreatePlanResponse = transport
        .send(ServiceRequest::post(
            format!("v1/{project}/plans"),
            plan.as_json(),
        ))?
        .into_json(CREATE_CONTEXT)?;

    if response.name.is_empty() {
        return Err(Error::Service {
            context: CREATE_CONTEXT.to_string(),
            status: STATUS_OK,
            message: "response has no plan name".to_string(),
        });
    }

    info!(plan = %response.name, "plan created");
    Ok(response.name)
}
