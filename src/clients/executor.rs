//! Request execution against the Peering Manager API.
//!
//! [`RequestExecutor`] sits between the record layer and the raw
//! transport: it issues requests through [`HttpClient`], maps non-2xx
//! statuses to [`RequestError`], and validates that response bodies
//! have the structure the record layer relies on, raising
//! [`ContentError`] when they do not.
//!
//! The executor is stateless apart from the shared connection pool and
//! is safe to call concurrently from any number of endpoints and
//! listings.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::clients::http_client::{HttpClient, RawResponse};
use crate::config::ApiConfig;
use crate::error::{ContentError, Error, RequestError};

/// One page of a listing response.
///
/// Peering Manager uses the Django REST Framework envelope: a `results`
/// array, a `count` of the full result set, and `next`/`previous` page
/// URLs. Absence of `next` means the last page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Raw objects on this page, in server order.
    pub items: Vec<Value>,
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// Total number of results across all pages, when reported.
    pub count: Option<u64>,
}

/// Issues HTTP calls and maps failures to typed errors.
#[derive(Debug)]
pub struct RequestExecutor {
    http: HttpClient,
}

// Verify RequestExecutor is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestExecutor>();
};

impl RequestExecutor {
    /// Creates an executor with a fresh transport for the given
    /// configuration.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }

    /// Fetches one page of a listing.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure or non-2xx status,
    /// and [`ContentError`] if the body is not a valid pagination
    /// envelope (an object with a `results` array).
    pub async fn fetch_page(
        &self,
        url: &str,
        query: Option<&HashMap<String, String>>,
    ) -> Result<Page, Error> {
        let response = self.http.get(url, query).await?;
        let body = Self::parse_ok_body(response)?;

        let Value::Object(mut envelope) = body else {
            return Err(ContentError::BadEnvelope {
                reason: "body is not a JSON object",
            }
            .into());
        };

        let items = match envelope.remove("results") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ContentError::BadEnvelope {
                    reason: "'results' is not an array",
                }
                .into())
            }
            None => {
                return Err(ContentError::BadEnvelope {
                    reason: "missing 'results' array",
                }
                .into())
            }
        };

        let next = match envelope.remove("next") {
            Some(Value::String(next)) => Some(next),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(ContentError::BadEnvelope {
                    reason: "'next' is neither a URL nor null",
                }
                .into())
            }
        };

        let count = envelope.get("count").and_then(Value::as_u64);

        Ok(Page { items, next, count })
    }

    /// Fetches a single resource by URL.
    ///
    /// Returns `None` on a 404: for single-resource lookups absence is
    /// a legitimate outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on any other non-2xx status and
    /// [`ContentError`] if the success body is not a JSON object.
    pub async fn fetch_one(&self, url: &str) -> Result<Option<Map<String, Value>>, Error> {
        let response = self.http.get(url, None).await?;
        if response.status == 404 {
            return Ok(None);
        }
        let body = Self::parse_ok_body(response)?;
        Ok(Some(Self::expect_object(body)?))
    }

    /// Creates a resource with a POST and returns the created object.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on non-2xx status and [`ContentError`]
    /// if the success body is not a JSON object.
    pub async fn create(&self, url: &str, body: &Value) -> Result<Map<String, Value>, Error> {
        let response = self.http.post(url, body).await?;
        let body = Self::parse_ok_body(response)?;
        Ok(Self::expect_object(body)?)
    }

    /// Partially updates a resource with a PATCH and returns the
    /// post-update object.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on non-2xx status and [`ContentError`]
    /// if the success body is not a JSON object.
    pub async fn patch(&self, url: &str, body: &Value) -> Result<Map<String, Value>, Error> {
        let response = self.http.patch(url, body).await?;
        let body = Self::parse_ok_body(response)?;
        Ok(Self::expect_object(body)?)
    }

    /// Deletes a resource.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on non-2xx status.
    pub async fn delete(&self, url: &str) -> Result<(), Error> {
        let response = self.http.delete(url).await?;
        if !response.is_ok() {
            return Err(RequestError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        Ok(())
    }

    /// Fetches a flat JSON object, e.g. the instance status document.
    ///
    /// Thin pass-through with no hydration involved.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on non-2xx status and [`ContentError`]
    /// if the body is not a JSON object.
    pub async fn fetch_flat(&self, url: &str) -> Result<Map<String, Value>, Error> {
        let response = self.http.get(url, None).await?;
        let body = Self::parse_ok_body(response)?;
        Ok(Self::expect_object(body)?)
    }

    /// Maps a non-2xx status to [`RequestError`] and parses the body of
    /// a successful response as JSON.
    fn parse_ok_body(response: RawResponse) -> Result<Value, Error> {
        if !response.is_ok() {
            return Err(RequestError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| {
            ContentError::InvalidJson {
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn expect_object(body: Value) -> Result<Map<String, Value>, ContentError> {
        match body {
            Value::Object(map) => Ok(map),
            other => Err(ContentError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }
}

/// Human-readable JSON type name for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
