//! HTTP engine error types.

/// Errors that can occur while talking to a forge API.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Connection, TLS, DNS or read failure below the HTTP layer.
    #[error("request to {url} failed: transport error: {reason}")]
    Transport {
        /// The endpoint that was being requested.
        url: String,
        /// Transport-level reason as reported by the HTTP stack.
        reason: String,
    },

    /// The server answered with a status of 300 or above. The message is
    /// whatever the backend's API-error extractor pulled from the body.
    #[error("request to {url} failed with code {status}: API error: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// A percent-encoded string could not be decoded.
    #[error("could not urldecode {0:?}")]
    UrlDecode(String),

    /// A local file for an upload could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the HTTP engine.
pub type Result<T> = std::result::Result<T, HttpError>;
