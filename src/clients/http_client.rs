//! Raw HTTP transport for the Peering Manager API.
//!
//! This module provides [`HttpClient`], a thin wrapper over the shared
//! `reqwest` connection pool. It attaches default headers (User-Agent,
//! Accept, and the token-based Authorization header) and returns raw
//! status/body pairs. Interpreting status codes and body structure is
//! the caller's job; no retries are performed here.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::RequestError;

/// Client version from Cargo.toml, reported in the User-Agent header.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A raw HTTP response: status code plus unparsed body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body as text. May be empty (e.g. for 204).
    pub body: String,
}

impl RawResponse {
    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP transport shared by all endpoints of one API instance.
///
/// The underlying `reqwest::Client` holds a connection pool that is
/// safe for concurrent use from any number of logical callers, so one
/// `HttpClient` can back many endpoints and listings at once.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g. TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}peering-manager-rust v{CLIENT_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        if let Some(token) = config.token() {
            if !token.is_empty() {
                default_headers.insert("Authorization".to_string(), format!("Token {token}"));
            }
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers,
        }
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Performs a GET request with optional query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] if the request never
    /// produced a response. Non-2xx statuses are *not* an error at
    /// this layer.
    pub async fn get(
        &self,
        url: &str,
        query: Option<&HashMap<String, String>>,
    ) -> Result<RawResponse, RequestError> {
        let mut builder = self.client.get(url);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        self.send(builder, "GET", url).await
    }

    /// Performs a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] on connection failure.
    pub async fn post(&self, url: &str, body: &Value) -> Result<RawResponse, RequestError> {
        self.send(self.client.post(url).json(body), "POST", url)
            .await
    }

    /// Performs a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] on connection failure.
    pub async fn patch(&self, url: &str, body: &Value) -> Result<RawResponse, RequestError> {
        self.send(self.client.patch(url).json(body), "PATCH", url)
            .await
    }

    /// Performs a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] on connection failure.
    pub async fn delete(&self, url: &str) -> Result<RawResponse, RequestError> {
        self.send(self.client.delete(url), "DELETE", url).await
    }

    async fn send(
        &self,
        mut builder: reqwest::RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<RawResponse, RequestError> {
        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }

        tracing::debug!(method, url, "sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(method, url, status, "received response");

        Ok(RawResponse { status, body })
    }
}
