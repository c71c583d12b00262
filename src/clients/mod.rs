//! HTTP layer: raw transport and the typed request executor.
//!
//! [`HttpClient`] owns the shared connection pool and default headers;
//! [`RequestExecutor`] issues the API's operations over it and maps
//! failures to the crate's error taxonomy. Everything above this module
//! (hydration, diffing, endpoints) is network-free and talks to the
//! server exclusively through [`RequestExecutor`].

mod executor;
mod http_client;

pub use executor::{Page, RequestExecutor};
pub use http_client::{HttpClient, RawResponse, CLIENT_VERSION};

pub(crate) use executor::json_type_name;
