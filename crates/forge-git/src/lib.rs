//! Git integration: repository discovery and forge inference.
//!
//! The forge kind and the upstream `owner/repo` can usually be read off
//! the working copy's git remotes, so that plain `fcli issues` works
//! inside a checkout with no flags at all. This crate parses
//! `.git/config` directly rather than shelling out.

pub mod gitdir;
pub mod remote;

pub use gitdir::find_git_root;
pub use remote::{read_remotes, select_remote, Remote};

/// Errors that can occur during git discovery.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// Not inside a git repository.
    #[error("not a git repository (or any parent)")]
    NotARepo,

    /// The repository's config file could not be read.
    #[error("failed to read git config: {0}")]
    Read(#[from] std::io::Error),

    /// The repository has no remotes to infer from.
    #[error("no git remotes to auto-detect forge from")]
    NoRemotes,
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;
