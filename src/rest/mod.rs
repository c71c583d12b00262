//! Record mapping: schemas, hydration, lazy relations, change
//! tracking, and paginated listings.
//!
//! The flow through this module:
//!
//! 1. A [`Schema`] (from the [`SchemaRegistry`]) declares how each
//!    field of a resource type is interpreted.
//! 2. [`Record::hydrate`] turns one raw JSON object into a [`Record`]
//!    with lazy relation slots and a change-tracking snapshot.
//! 3. Relation accessors resolve slots on demand: embedded objects
//!    locally, bare references via one memoized detail fetch.
//! 4. [`Record::save`] computes a minimal diff against the snapshot and
//!    PATCHes only what changed.
//! 5. [`Endpoint`] ties it together per resource type; its listings
//!    come back as a lazy [`RecordStream`] with optional bounded
//!    prefetch.

mod endpoint;
mod paginate;
mod record;
mod schema;
mod tracking;

pub use endpoint::Endpoint;
pub use paginate::RecordStream;
pub use record::{EndpointContext, Record};
pub use schema::{FieldKind, FieldSpec, Schema, SchemaRegistry, SchemaRegistryBuilder};
