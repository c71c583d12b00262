//! # Peering Manager Rust client
//!
//! A Rust client for the [Peering Manager](https://peering-manager.net)
//! REST API, mapping its paginated JSON resources onto lazy records
//! with relationship resolution and minimal-diff saves.
//!
//! ## Overview
//!
//! This client provides:
//! - Validated, instance-based configuration via [`ApiConfig`] and
//!   [`ApiConfigBuilder`]
//! - A schema registry describing each resource type's relation fields,
//!   with the full Peering Manager table in [`models::default_registry`]
//! - [`Record`]s hydrated from raw JSON, with field access via
//!   [`Record::get`]
//! - Lazy, memoized relationship resolution: embedded objects resolve
//!   locally, bare id/URL references with one detail fetch each
//! - Change tracking: [`Record::save`] PATCHes only the fields that
//!   changed since hydration, and is a no-op on a clean record
//! - Lazy paginated listings as a [`RecordStream`], optionally
//!   prefetching pages concurrently while preserving server order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use peering_manager::{Api, ApiConfig, models};
//!
//! let config = ApiConfig::builder()
//!     .url("https://peering.example.net")
//!     .token("0123456789abcdef")
//!     .build()?;
//! let api = Api::new(config, models::default_registry());
//!
//! // Walk a filtered listing lazily.
//! let sessions = api.endpoint("internet-exchange-peering-sessions")?;
//! let mut enabled = sessions.filter(&[("status", "enabled")]);
//! while let Some(mut session) = enabled.try_next().await? {
//!     // Resolve a relation on demand; repeated access is free.
//!     let asn = session.relation("autonomous_system").await?;
//!     println!("{session} with {asn}");
//! }
//!
//! // Update a record; only the changed field goes over the wire.
//! if let Some(mut router) = api.endpoint("routers")?.get(7).await? {
//!     router.set("comments", serde_json::json!("audited 2024-06"));
//!     router.save().await?;
//! }
//! ```
//!
//! ## Concurrent pagination
//!
//! ```rust,ignore
//! let mut all = api
//!     .endpoint("autonomous-systems")?
//!     .all()
//!     .with_parallelism(4);
//! while let Some(asn) = all.try_next().await? {
//!     println!("{asn}");
//! }
//! ```
//!
//! Records come back in exactly the server-declared order regardless of
//! parallelism; the first failure is reported at the position where its
//! page's records would have appeared.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Configuration and schemas validate on construction
//! - **Lazy by default**: No listing page or relation is fetched before it is asked for
//! - **Minimal writes**: Saves send only the diff, never a full re-serialization
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod rest;

// Re-export public types at crate root for convenience
pub use api::Api;
pub use config::{ApiConfig, ApiConfigBuilder};
pub use error::{AllocationError, ConfigError, ContentError, Error, RequestError};
pub use rest::{
    Endpoint, EndpointContext, FieldKind, FieldSpec, Record, RecordStream, Schema, SchemaRegistry,
    SchemaRegistryBuilder,
};
