use tracing::info;

use crate::client::{ServiceRequest, Transport};
use crate::error::Result;

/// Ask the service to start the checks of `plan_name`.
///
/// Success only means the request was accepted; it says nothing about the
/// state of any run.
pub fn run_plan_checks(transport: &dyn Transport, plan_name: &str) -> Result<()> {
    transport
        .send(ServiceRequest::post(
            format!("v1/{plan_name}:runPlanChecks"),
            "{}",
        ))?
        .ensure_success("failed to run plan checks")?;

    info!(plan = plan_name, "plan checks started");
    Ok(())
}
