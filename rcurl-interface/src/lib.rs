//! Transport-agnostic model and execution contract for rcurl back ends.
//!
//! This crate defines everything a back end needs to execute a request that
//! was parsed from a curl command line: the request and response descriptors,
//! the multi-valued header and parameter maps, the [`Executor`] trait, and
//! the [`wire`] module that holds all policy shared between back ends (URL
//! resolution, header synthesis, multipart layout, retry, response limits
//! and content decoding).
//!
//! Back ends translate a prepared [`wire::RequestPlan`] into their transport
//! library's native request type and hand status, headers and the body
//! stream back to [`wire`], so that every back end produces an equivalent
//! [`ResponseDescriptor`] for the same [`RequestDescriptor`].

#![deny(missing_docs)]

pub mod executor;
pub mod header;
pub mod multimap;
pub mod request;
pub mod response;
pub mod wire;

mod error;

pub use error::{Error, Result};
pub use executor::Executor;
pub use header::HeaderMap;
pub use multimap::OrderedMultiMap;
pub use request::{FormField, ProxyConfig, ProxyKind, RequestConfig, RequestDescriptor};
pub use response::ResponseDescriptor;
