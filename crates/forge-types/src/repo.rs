//! Repositories and forks.

use serde::Serialize;

/// A repository, normalized across backends.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Repo {
    pub id: u64,
    /// `owner/name`.
    pub full_name: String,
    pub name: String,
    pub owner: String,
    pub date: String,
    pub visibility: String,
    pub is_fork: bool,
}

/// A fork of a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fork {
    pub full_name: String,
    pub owner: String,
    pub date: String,
    pub forks_count: i32,
}

/// Repository visibility levels accepted by `repo_set_visibility`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Options for creating a repository under the authenticated account.
#[derive(Debug, Clone, Default)]
pub struct RepoCreateOptions {
    pub name: String,
    pub description: String,
    pub private: bool,
}
