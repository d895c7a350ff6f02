//! Remote change service client
//!
//! Every exchange with the change service goes through the [`Transport`]
//! trait. The workflow modules build [`ServiceRequest`]s and interpret
//! [`ServiceResponse`]s; the transport only moves bytes.

mod http;

pub use http::{HttpTransport, HTTP_CONNECT_TIMEOUT_SECS, HTTP_REQUEST_TIMEOUT_SECS};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// The only status the service uses to signal success.
pub const STATUS_OK: u16 = 200;

/// HTTP method of a service request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request against the change service, relative to its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub method: Method,
    /// Path below the base URL, e.g. `v1/projects/demo:previewPlan`
    pub path: String,
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<String>,
}

impl ServiceRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }
}

/// Raw answer from the change service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    /// Response body, `None` when the service sent nothing
    pub body: Option<String>,
}

/// Error payload shape shared by every endpoint
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ServiceResponse {
    pub fn new(status: u16, body: Option<String>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Message to surface for a failed call.
    ///
    /// Prefers the `message` field of a JSON body and falls back to the raw
    /// body text.
    pub fn remote_message(&self) -> String {
        let Some(body) = self.body.as_deref() else {
            return String::new();
        };

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: Some(message),
            }) => message,
            _ => body.trim().to_string(),
        }
    }

    /// Return the body of a successful response.
    ///
    /// Fails with [`Error::Service`] on a non-success status, and also when a
    /// successful response carries no body (empty or JSON `null`).
    pub fn into_body(self, context: &str) -> Result<String> {
        if !self.is_success() {
            return Err(Error::Service {
                context: context.to_string(),
                status: self.status,
                message: self.remote_message(),
            });
        }

        match self.body {
            Some(body) if !body.trim().is_empty() && body.trim() != "null" => Ok(body),
            _ => Err(Error::Service {
                context: context.to_string(),
                status: self.status,
                message: "expected a response body, got none".to_string(),
            }),
        }
    }

    /// Decode the body of a successful response as JSON.
    pub fn into_json<T: DeserializeOwned>(self, context: &str) -> Result<T> {
        let body = self.into_body(context)?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            context: context.to_string(),
            source,
        })
    }

    /// Check the status only; the body, if any, is ignored.
    pub fn ensure_success(self, context: &str) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(Error::Service {
            context: context.to_string(),
            status: self.status,
            message: self.remote_message(),
        })
    }
}

/// Request/response exchange with the change service.
///
/// Implementations handle addressing and authentication. A transport must
/// return non-success statuses as a [`ServiceResponse`], not as an error;
/// errors are reserved for requests that produced no response at all.
pub trait Transport {
    fn send(&self, request: ServiceRequest) -> Result<ServiceResponse>;
}
