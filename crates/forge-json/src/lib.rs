//! Streaming JSON support for forge API traffic.
//!
//! API responses are pulled through [`decode::Stream`], a token-level
//! reader with typed helpers, so that adapters can pick the handful of
//! fields they need out of large response objects without materializing
//! them. Request payloads are produced with [`encode::JsonGen`], a
//! scope-tracking builder.
//!
//! Scalar token parsing and string escaping are delegated to
//! `serde_json`, so quoting/unescaping behaviour matches the rest of the
//! ecosystem.

pub mod decode;
pub mod encode;

pub use decode::{DecodeError, Event, EventKind, Stream};
pub use encode::{EncodeError, JsonGen};
