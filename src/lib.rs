//! A curl-command-to-HTTP-request translator with pluggable back ends.
//!
//! ## Overview
//!
//! rcurl turns a curl command line — or equivalent structured options — into
//! a transport-agnostic request description, then executes it on one of
//! several interchangeable HTTP back ends. The pieces compose left to right:
//!
//! command string → [`tokenize`] → argument array → [`parse_args`] →
//! [`RequestDescriptor`] → (optionally mutated further through [`Curl`]) →
//! [`Executor::execute`] → [`ResponseDescriptor`].
//!
//! The descriptors are plain data: multi-valued headers and query
//! parameters, one of three body kinds (text, binary, multipart form),
//! Basic credentials, cookies and a configuration block covering timeouts,
//! redirects, TLS verification, proxying, retries and a response size cap.
//! Transport concerns — connections, TLS handshakes, pooling, HTTP framing —
//! belong entirely to the back end's HTTP library.
//!
//! ## Back ends
//!
//! Three back-end crates ship with the workspace, selected by cargo
//! features; all of them translate the same wire plan, so they produce
//! equivalent responses for the same descriptor:
//!
//! - `ureq` (default): pure-Rust transport via [`ureq`].
//! - `reqwest`: the blocking [`reqwest`] client.
//! - `curl`: libcurl via the [`curl`] crate.
//!
//! The first enabled feature in that order provides [`DefaultExecutor`],
//! used by [`exec`] and [`Curl::exec`]; any [`Executor`] implementation can
//! be supplied explicitly through [`Curl::exec_with`].
//!
//! [`ureq`]: https://docs.rs/ureq
//! [`reqwest`]: https://docs.rs/reqwest
//! [`curl`]: https://docs.rs/curl
//!
//! ## Usage
//!
//! ```no_run
//! let response = rcurl::exec(
//!     "curl -X POST https://httpbin.org/post \
//!      -H 'Content-Type: application/json' \
//!      -d '{\"user\":\"john\",\"action\":\"login\"}'",
//! )?;
//! println!("{}: {}", response.status_code, response.text());
//! # Ok::<(), rcurl::Error>(())
//! ```
//!
//! Or through the fluent builder, picking a back end explicitly:
//!
//! ```no_run
//! use rcurl::Curl;
//!
//! let response = Curl::new()
//!     .url("https://httpbin.org/get")
//!     .query_param("page", "2")
//!     .header("Accept", "application/json")
//!     .exec_with(&rcurl::DefaultExecutor::new())?;
//! # Ok::<(), rcurl::Error>(())
//! ```

#![forbid(missing_docs)]

mod builder;
mod parser;
mod tokenizer;

pub use builder::Curl;
pub use parser::{parse, parse_args};
pub use tokenizer::tokenize;

pub use rcurl_interface::{
    Error, Executor, FormField, HeaderMap, OrderedMultiMap, ProxyConfig, ProxyKind,
    RequestConfig, RequestDescriptor, ResponseDescriptor, Result,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "ureq")] {
        /// The back end used when none is chosen explicitly.
        pub use rcurl_backend_ureq::UreqExecutor as DefaultExecutor;
    } else if #[cfg(feature = "reqwest")] {
        /// The back end used when none is chosen explicitly.
        pub use rcurl_backend_reqwest::ReqwestExecutor as DefaultExecutor;
    } else if #[cfg(feature = "curl")] {
        /// The back end used when none is chosen explicitly.
        pub use rcurl_backend_curl::CurlExecutor as DefaultExecutor;
    }
}

/// Parse a curl command string and execute it on the default back end.
///
/// Shortcut for [`Curl::from_command`] followed by [`Curl::exec`].
#[cfg(any(feature = "ureq", feature = "reqwest", feature = "curl"))]
pub fn exec(command: &str) -> Result<ResponseDescriptor> {
    Curl::from_command(command)?.exec()
}
