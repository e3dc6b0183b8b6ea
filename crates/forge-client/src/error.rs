//! Client error types.

use forge_http::HttpError;
use forge_json::{DecodeError, EncodeError};

/// Errors that can occur while executing a forge operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The selected backend does not implement this operation.
    #[error("{0} is not available on this forge")]
    Unsupported(&'static str),

    /// Transport failure or an API error response.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response did not have the expected shape.
    #[error("could not parse response: {0}")]
    Decode(#[from] DecodeError),

    /// Payload generator misuse.
    #[error("could not generate payload: {0}")]
    Encode(#[from] EncodeError),

    /// A caller-visible precondition was violated.
    #[error("{0}")]
    Input(String),

    /// Configuration lookup failed.
    #[error(transparent)]
    Config(#[from] forge_config::ConfigError),

    /// Git discovery/inference failed.
    #[error(transparent)]
    Git(#[from] forge_git::GitError),

    /// The forge type could not be determined.
    #[error("cannot determine forge type (set one with --forge, the repo .fcli file, or an account)")]
    UnknownForge,

    /// A local file could not be read or written.
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the client crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an [`Error::Input`] with the given message.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Creates an [`Error::Io`] for the given path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
