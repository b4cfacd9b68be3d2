//! Unified error type.

use thiserror::Error;

/// The error type returned by backlog's fallible operations.
///
/// Application-level errors (404, 400, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// startup and infrastructure failures: a route pattern that does not
/// compile, unusable configuration, binding to a port.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("config: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid listen address `{0}`")]
    InvalidAddr(String),
}
