//! The pluggable execution contract.

use std::fmt;

use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;
use crate::Result;

/// A back end that turns a [`RequestDescriptor`] into a real HTTP exchange.
///
/// Implementations must be safe to share between threads. Per-request state
/// — TLS verification overrides, proxies, timeouts — is derived from the
/// descriptor's config on every call instead of being stored on the executor
/// or in process-wide defaults, so one insecure request cannot weaken
/// unrelated concurrent requests.
///
/// For the same descriptor every back end must produce an equivalent
/// [`ResponseDescriptor`], modulo header ordering and transport details;
/// back ends achieve this by delegating URL resolution, header synthesis,
/// body selection, retries and response decoding to [`crate::wire`].
pub trait Executor: Send + Sync {
    /// Short human-readable description of the back end.
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Executor")
    }

    /// Perform the request, honoring the retry policy and the response
    /// limits in the descriptor's config. Fails with an I/O error after the
    /// retry budget is exhausted.
    fn execute(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor>;
}
