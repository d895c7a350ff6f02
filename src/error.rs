//! Error types for the release-plan library.

use crate::checks::{AggregateStatus, CheckFailureKind};
use crate::plan::{format_database_files, DatabaseFiles};

/// The result type used throughout release-plan.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a deployment workflow.
///
/// None of these are retried. They propagate to the caller, which reports the
/// message and fails the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied configuration is missing or invalid.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The change service answered with a non-success status or an empty body.
    #[error("{context}, {status}, {message}")]
    Service {
        /// The operation that failed, e.g. "failed to preview plan".
        context: String,
        /// HTTP status returned by the service.
        status: u16,
        /// Message reported by the service, verbatim when present.
        message: String,
    },

    /// Preview found out-of-order files while out-of-order apply is disallowed.
    #[error("found out of order files\n{}", format_database_files(.files))]
    Validation {
        /// The offending files, grouped by database.
        files: Vec<DatabaseFiles>,
    },

    /// Plan checks reached a disqualifying state.
    #[error("{kind}")]
    CheckFailure {
        /// Which condition fired.
        kind: CheckFailureKind,
        /// Aggregate counts from the cycle that fired it.
        status: AggregateStatus,
    },

    /// The request never produced a response.
    #[error("request to {path} failed: {source}")]
    Transport {
        /// Service-relative path of the request.
        path: String,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// A response body could not be decoded.
    #[error("failed to decode {context} response: {source}")]
    Decode {
        /// The operation whose response was malformed.
        context: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing a workflow output failed.
    #[error("failed to write output to {path}: {source}")]
    Output {
        /// Path of the output file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
