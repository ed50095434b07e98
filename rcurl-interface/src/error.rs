use thiserror::Error;

/// Errors produced while parsing curl arguments, building a request or
/// executing it against a back end.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed flag usage: a missing value, bad header/form syntax, an
    /// unknown flag, a missing URL or an unparsable numeric argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The transport client could not be configured, e.g. building the TLS
    /// context for an insecure connection failed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Connection, send or read failure reported by the transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The response body exceeded the configured max download size.
    #[error("response body size exceeds the max download limit")]
    ResponseTooLarge,
    /// Every attempt allowed by the retry policy failed; wraps the last
    /// transport failure.
    #[error("request failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        /// Total number of attempts made, including the first one.
        attempts: u32,
        /// The failure of the final attempt.
        #[source]
        source: Box<Error>,
    },
}

/// A `Result` alias where the `Err` case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the retry policy may replay the request after this error.
    ///
    /// Only transport-class failures qualify; argument and configuration
    /// errors would fail identically on every attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Io(_) | Error::ResponseTooLarge)
    }
}
