//! Blocking HTTP engine shared by all forge backends.
//!
//! One persistent [`Client`] lives in each context. Requests carry the
//! forge-specific auth header and API-error extractor in an [`Endpoint`],
//! so this crate stays ignorant of which forge it is talking to. The
//! engine never retries; callers own retry policy.

pub mod client;
pub mod error;
pub mod pagination;
pub mod url;

pub use client::{ApiErrorFn, Client, Endpoint, Response};
pub use error::{HttpError, Result};
pub use pagination::parse_link_header;
pub use url::{urldecode, urlencode};
