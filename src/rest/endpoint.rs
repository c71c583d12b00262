//! Endpoints: the operations of one resource type.
//!
//! An [`Endpoint`] binds a resource type's [`Schema`] to its URL under
//! the API base and exposes the operations of that resource: single
//! lookups, filtered listings, counting, creation, and deletion.
//! Endpoints are stateless beyond that binding and cheap to clone; any
//! number of them share one executor and its connection pool safely.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{AllocationError, Error};
use crate::rest::paginate::RecordStream;
use crate::rest::record::{EndpointContext, Record};
use crate::rest::schema::Schema;

/// Operations on one resource type of a Peering Manager instance.
///
/// Obtained from [`crate::Api::endpoint`].
///
/// # Example
///
/// ```rust,ignore
/// let routers = api.endpoint("routers")?;
///
/// // Single lookup; absence is a legitimate outcome.
/// if let Some(mut router) = routers.get(7).await? {
///     router.set("comments", serde_json::json!("audited"));
///     router.save().await?;
/// }
///
/// // Filtered listing.
/// let mut enabled = routers.filter(&[("status", "enabled")]);
/// while let Some(router) = enabled.try_next().await? {
///     println!("{router}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    ctx: EndpointContext,
    schema: Arc<Schema>,
    parallelism: usize,
}

impl Endpoint {
    pub(crate) fn new(ctx: EndpointContext, schema: Arc<Schema>, parallelism: usize) -> Self {
        Self {
            ctx,
            schema,
            parallelism,
        }
    }

    /// The resource type this endpoint serves.
    #[must_use]
    pub fn resource_type(&self) -> &'static str {
        self.schema.resource_type()
    }

    /// The schema records from this endpoint hydrate against.
    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The listing URL of this resource type.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/{}/", self.ctx.base_url, self.schema.path())
    }

    fn detail_url(&self, id: impl Display) -> String {
        format!("{}/{}/{}/", self.ctx.base_url, self.schema.path(), id)
    }

    /// Fetches one record by id.
    ///
    /// Returns `Ok(None)` on a 404: for a single lookup, absence is an
    /// expected outcome, not an error.
    ///
    /// # Errors
    ///
    /// Propagates the executor's request/content errors and hydration
    /// failures.
    pub async fn get(&self, id: impl Display + Send) -> Result<Option<Record>, Error> {
        let url = self.detail_url(id);
        match self.ctx.executor.fetch_one(&url).await? {
            None => Ok(None),
            Some(raw) => Ok(Some(Record::hydrate(raw, &self.schema, self.ctx.clone())?)),
        }
    }

    /// Returns a lazy stream over every record of this resource type.
    ///
    /// Nothing is fetched until the first
    /// [`try_next`](RecordStream::try_next) call.
    #[must_use]
    pub fn all(&self) -> RecordStream {
        self.stream(None)
    }

    /// Returns a lazy stream over records matching the given query
    /// parameters.
    #[must_use]
    pub fn filter(&self, params: &[(&str, &str)]) -> RecordStream {
        let query: HashMap<String, String> = params
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        self.stream(Some(query))
    }

    fn stream(&self, query: Option<HashMap<String, String>>) -> RecordStream {
        RecordStream::new(
            self.ctx.clone(),
            Arc::clone(&self.schema),
            self.base_url(),
            query,
            self.parallelism,
        )
    }

    /// Counts records matching the given query parameters without
    /// walking the listing.
    ///
    /// Issues a single minimal page request and reads the envelope's
    /// `count`.
    ///
    /// # Errors
    ///
    /// Propagates request errors; returns a content error if the
    /// envelope does not report a count.
    pub async fn count(&self, params: &[(&str, &str)]) -> Result<u64, Error> {
        let mut query: HashMap<String, String> = params
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        query.insert("limit".to_string(), "1".to_string());

        let page = self
            .ctx
            .executor
            .fetch_page(&self.base_url(), Some(&query))
            .await?;
        page.count.ok_or_else(|| {
            crate::error::ContentError::BadEnvelope {
                reason: "missing 'count'",
            }
            .into()
        })
    }

    /// Creates a resource with the given field set and returns the
    /// hydrated record the server answered with.
    ///
    /// The POST body is the full field set as given; partial-update
    /// minimization only applies to [`Record::save`].
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::IdNotAssigned`] if the creation
    /// response lacks an id; the server always assigns one, so its
    /// absence is a contract violation, not a transient failure. Also
    /// propagates request/content errors.
    pub async fn create(&self, fields: Value) -> Result<Record, Error> {
        tracing::debug!(resource_type = self.resource_type(), "creating resource");
        let raw = self.ctx.executor.create(&self.base_url(), &fields).await?;
        let record = Record::hydrate(raw, &self.schema, self.ctx.clone())?;
        if record.id().is_none() {
            return Err(AllocationError::IdNotAssigned {
                resource_type: self.resource_type().to_string(),
            }
            .into());
        }
        Ok(record)
    }

    /// Deletes one record by id.
    ///
    /// # Errors
    ///
    /// Propagates the executor's request errors; a 404 surfaces as a
    /// [`crate::RequestError::Status`].
    pub async fn delete(&self, id: impl Display + Send) -> Result<(), Error> {
        self.ctx.executor.delete(&self.detail_url(id)).await
    }
}
