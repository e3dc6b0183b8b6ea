//! Forge abstraction core.
//!
//! The [`Forge`] trait is the uniform operation set every backend
//! implements; [`Context`] carries the resolved configuration, the
//! forge-kind resolution chain and the persistent HTTP client; the
//! backend modules translate the uniform operations into each forge's
//! REST dialect and back into the normalized `forge_types` shapes.
//!
//! Operations a backend does not support fail uniformly with
//! `"<op> is not available on this forge"` and never touch the network.

pub mod bugzilla;
pub mod context;
pub mod error;
pub mod forge;
pub mod gitea;
pub mod github;
pub mod gitlab;

mod parse;
mod session;

pub use context::{Context, ContextBuilder};
pub use error::{Error, Result};
pub use forge::{forge, Forge};
