//! Plan check execution and polling
//!
//! Triggers the service-side checks for a plan, then polls the latest run of
//! every check until none is running or one of them disqualifies the plan.

mod aggregate;
mod poller;
mod runs;
mod trigger;
mod types;


pub use aggregate::{aggregate, AggregateStatus, CheckFailureKind};
pub use poller::{PollConfig, Poller, Sleeper, ThreadSleeper, DEFAULT_POLL_INTERVAL};
pub use runs::{list_all_plan_check_runs, PAGE_SIZE};
pub use trigger::run_plan_checks;
pub use types::{CheckResult, PlanCheckRun, ResultStatus, RunStatus};
