//! End-to-end tests for release-plan
//!
//! Every test talks HTTP to a local fixture server that plays the change
//! service, either through the library or through the compiled binary.

pub mod cli;
pub mod helpers;

pub use helpers::*;
