//! Error types for the Peering Manager client.
//!
//! The taxonomy separates four failure classes:
//!
//! - [`RequestError`]: the transport or the server rejected a request
//!   (connection failure, non-2xx status).
//! - [`ContentError`]: a payload violates the structural contract the
//!   client relies on (bad pagination envelope, malformed relation
//!   shape). Raised at parse/hydration time, never retried.
//! - [`AllocationError`]: a semantic expectation about resource
//!   existence or identity was violated (dangling reference, creation
//!   response without an id).
//! - [`ConfigError`]: client-side misconfiguration (unregistered
//!   resource type, invalid base URL). Always detectable before any
//!   network traffic.
//!
//! Operations that can fail in more than one of these ways return the
//! umbrella [`Error`], which wraps each class transparently.

use thiserror::Error;

/// A transport or HTTP-level failure.
///
/// Covers both connection-level problems (DNS, TLS, timeouts) and
/// non-2xx responses. For non-2xx responses the raw response body is
/// preserved for diagnostics.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The raw response body, useful for server-side error details.
        body: String,
    },

    /// A background request task ended without producing a result.
    #[error("background request task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

/// A payload violated the structural contract expected by the client.
///
/// Structural violations are detected eagerly: a malformed relation
/// value fails at hydration time, not later when the relation is
/// accessed.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A listing response was not a valid pagination envelope.
    #[error("invalid pagination envelope: {reason}")]
    BadEnvelope {
        /// What was wrong with the envelope.
        reason: &'static str,
    },

    /// A response body that should contain one resource was not a JSON
    /// object.
    #[error("expected a JSON object in the response body, got {found}")]
    NotAnObject {
        /// A short description of what was found instead.
        found: &'static str,
    },

    /// A response body could not be parsed as JSON at all.
    #[error("response body is not valid JSON: {reason}")]
    InvalidJson {
        /// The underlying parse failure.
        reason: String,
    },

    /// A relation field held a value of an unusable shape.
    #[error("relation field '{field}' {reason}")]
    BadRelationShape {
        /// The offending field name.
        field: String,
        /// Why the value cannot be interpreted as a relation.
        reason: &'static str,
    },
}

/// A semantic expectation about resource existence or identity failed.
///
/// Distinct from [`RequestError`]: the request itself succeeded (or
/// returned an expected 404), but the result contradicts what the data
/// model guarantees.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// A reference slot pointed at a resource that does not exist.
    ///
    /// An expected-absent single lookup returns `None`; a dangling
    /// reference inside another record is a data-integrity failure.
    #[error("referenced {resource_type} at {url} does not exist")]
    DanglingReference {
        /// The resource type of the missing referent.
        resource_type: String,
        /// The detail URL that returned 404.
        url: String,
    },

    /// A creation response did not carry a server-assigned id.
    #[error("server returned a created {resource_type} without an id")]
    IdNotAssigned {
        /// The resource type being created.
        resource_type: String,
    },

    /// A record has no canonical URL to address a mutation at.
    #[error("{resource_type} record has no URL to address it by")]
    UrlMissing {
        /// The resource type of the record.
        resource_type: String,
    },
}

/// Client-side configuration errors.
///
/// All variants are detectable before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A schema was requested for a resource type that was never
    /// registered.
    #[error("no schema registered for resource type '{resource_type}'")]
    UnknownResourceType {
        /// The resource type that was looked up.
        resource_type: String,
    },

    /// The base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The URL that was provided.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required configuration field was not set.
    #[error("missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

/// Umbrella error for operations that can fail in multiple ways.
#[derive(Debug, Error)]
pub enum Error {
    /// A transport or HTTP failure.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A structural contract violation.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// A resource existence/identity violation.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// A configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
