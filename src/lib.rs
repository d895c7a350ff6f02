pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod plan;
pub mod report;
pub mod validation;
pub mod workflow;


pub use error::{Error, Result};
