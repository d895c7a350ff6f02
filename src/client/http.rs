//! HTTP transport for the change service.
//!
//! A blocking reqwest client with bearer-token auth and bounded timeouts.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

use super::{Method, ServiceRequest, ServiceResponse, Transport};
use crate::error::{Error, Result};

pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120; // Total request timeout (includes connection + transfer)

/// Transport that talks to the change service over HTTP(S).
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` authenticating with `token`.
    ///
    /// Trailing slashes on the base URL are ignored.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::configuration("auth token contains invalid header characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("release-plan/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|source| Error::Transport {
                path: String::new(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ServiceRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, request.path)).map_err(|e| {
            Error::configuration(format!("invalid service URL '{}': {e}", self.base_url))
        })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        let url = self.url_for(&request)?;
        debug!(method = %request.method, %url, "sending change service request");

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self
                .client
                .post(url)
                .body(request.body.unwrap_or_default()),
        };

        let response = builder.send().map_err(|source| Error::Transport {
            path: request.path.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|source| Error::Transport {
            path: request.path.clone(),
            source,
        })?;
        debug!(status, bytes = text.len(), "change service responded");

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        Ok(ServiceResponse::new(status, body))
    }
}
