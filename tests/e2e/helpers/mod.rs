//! Test helpers for E2E tests
//!
//! - A fixture HTTP server that plays the change service
//! - Recording reporter and no-op sleeper for driving the workflow
//! - Canned service payloads

mod fixtures;
mod server;

pub use fixtures::{created_plan, preview_response, runs_page, RecordingReporter, NoSleep};
pub use server::{FixtureServer, RecordedRequest};
