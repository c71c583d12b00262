//! Client configuration.
//!
//! This module provides [`ApiConfig`] and [`ApiConfigBuilder`] for
//! configuring a [`crate::Api`] instance. Configuration is validated
//! fail-fast at build time and is immutable afterwards; there is no
//! global state.
//!
//! # Example
//!
//! ```rust
//! use peering_manager::ApiConfig;
//!
//! let config = ApiConfig::builder()
//!     .url("https://pm.example.net")
//!     .token("d6f4e314a5b5fefd164995169f28ae32d987704f")
//!     .parallelism(4)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(), "https://pm.example.net/api");
//! ```

use reqwest::Url;

use crate::error::ConfigError;

/// Immutable configuration for a Peering Manager API client.
///
/// Built once at startup via [`ApiConfig::builder`] and passed into
/// [`crate::Api::new`]. The instance URL is normalized so that
/// [`ApiConfig::base_url`] always points at the `/api` root without a
/// trailing slash.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Normalized API base URL, e.g. `https://pm.example.net/api`.
    base_url: String,
    /// Optional API token, sent as `Authorization: Token <token>`.
    token: Option<String>,
    /// Optional prefix prepended to the User-Agent header.
    user_agent_prefix: Option<String>,
    /// Default number of concurrent page fetches for listings.
    parallelism: usize,
}

impl ApiConfig {
    /// Returns a new builder with no fields set.
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    /// The normalized API base URL (`<instance>/api`, no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured API token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The configured User-Agent prefix, if any.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// The default page-fetch parallelism for listings.
    ///
    /// `1` means strictly sequential fetching.
    #[must_use]
    pub const fn parallelism(&self) -> usize {
        self.parallelism
    }
}

/// Builder for [`ApiConfig`].
///
/// Only `url` is required. `parallelism` defaults to `1` (sequential).
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    url: Option<String>,
    token: Option<String>,
    user_agent_prefix: Option<String>,
    parallelism: Option<usize>,
}

impl ApiConfigBuilder {
    /// Sets the Peering Manager instance URL (without the `/api` path).
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the API token used for authentication.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets a prefix for the User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the default number of concurrent page fetches for listings.
    ///
    /// Values below 1 are clamped to 1.
    #[must_use]
    pub const fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Validates the settings and builds an [`ApiConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `url` was not
    /// set, or [`ConfigError::InvalidBaseUrl`] if it cannot be parsed
    /// as an http(s) URL.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let url = self
            .url
            .ok_or(ConfigError::MissingRequiredField { field: "url" })?;

        let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let base_url = format!("{}/api", url.trim_end_matches('/'));

        Ok(ApiConfig {
            base_url,
            token: self.token,
            user_agent_prefix: self.user_agent_prefix,
            parallelism: self.parallelism.unwrap_or(1).max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_url() {
        let result = ApiConfig::builder().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "url" })
        ));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = ApiConfig::builder()
            .url("http://localhost:8000/")
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = ApiConfig::builder().url("not a url").build();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let result = ApiConfig::builder().url("ftp://pm.example.net").build();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_parallelism_defaults_to_sequential() {
        let config = ApiConfig::builder()
            .url("http://localhost:8000")
            .build()
            .unwrap();
        assert_eq!(config.parallelism(), 1);
    }

    #[test]
    fn test_parallelism_is_clamped_to_one() {
        let config = ApiConfig::builder()
            .url("http://localhost:8000")
            .parallelism(0)
            .build()
            .unwrap();
        assert_eq!(config.parallelism(), 1);
    }
}
