//! The top-level API handle.
//!
//! An [`Api`] binds an [`ApiConfig`] to a [`SchemaRegistry`] and hands
//! out [`Endpoint`]s per resource type. It owns the shared executor, so
//! every endpoint and record created through it reuses one connection
//! pool.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::RequestExecutor;
use crate::config::ApiConfig;
use crate::error::{ConfigError, Error};
use crate::rest::{Endpoint, EndpointContext, SchemaRegistry};

/// A connection to one Peering Manager instance.
///
/// # Example
///
/// ```rust,ignore
/// use peering_manager::{Api, ApiConfig, models};
///
/// let config = ApiConfig::builder()
///     .url("https://peering.example.net")
///     .token("0123456789abcdef")
///     .build()?;
/// let api = Api::new(config, models::default_registry());
///
/// let mut asns = api.endpoint("autonomous-systems")?.all();
/// while let Some(asn) = asns.try_next().await? {
///     println!("{asn}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Api {
    executor: Arc<RequestExecutor>,
    registry: Arc<SchemaRegistry>,
    base_url: String,
    parallelism: usize,
}

impl Api {
    /// Builds an API handle from a validated configuration and a schema
    /// registry.
    ///
    /// No network traffic happens here; the first request is issued by
    /// the first operation.
    #[must_use]
    pub fn new(config: ApiConfig, registry: SchemaRegistry) -> Self {
        Self {
            executor: Arc::new(RequestExecutor::new(&config)),
            registry: Arc::new(registry),
            base_url: config.base_url().to_string(),
            parallelism: config.parallelism(),
        }
    }

    /// The normalized API base URL, ending in `/api`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the endpoint for a resource type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownResourceType`] when the registry
    /// has no schema under that name.
    pub fn endpoint(&self, resource_type: &str) -> Result<Endpoint, ConfigError> {
        let schema = Arc::clone(self.registry.schema_for(resource_type)?);
        let ctx = EndpointContext::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.registry),
            self.base_url.clone(),
        );
        Ok(Endpoint::new(ctx, schema, self.parallelism))
    }

    /// Fetches the instance's status report: version, installed apps,
    /// and worker state.
    ///
    /// # Errors
    ///
    /// Propagates request errors and content errors for a non-object
    /// status body.
    pub async fn status(&self) -> Result<Map<String, Value>, Error> {
        self.executor
            .fetch_flat(&format!("{}/status/", self.base_url))
            .await
    }

    /// Fetches the Peering Manager version reported by the instance.
    ///
    /// Returns `Ok(None)` when the status report does not carry one.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Api::status`].
    pub async fn version(&self) -> Result<Option<String>, Error> {
        let status = self.status().await?;
        Ok(status
            .get("peering-manager-version")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Api>();
};
