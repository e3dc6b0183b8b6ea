//! Pull requests and merge requests, uniformly named "pulls".

use serde::Serialize;

/// A pull/merge request summary, normalized across backends.
///
/// Invariant: `merged` implies `state` is `"closed"` or `"merged"`.
/// Consult [`crate::quirks::PullQuirks`] before rendering the counter
/// fields; backends that cannot supply them leave them zeroed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pull {
    /// The number used in URLs and user-facing references (GitLab: iid).
    pub number: u64,
    /// Backend-internal id (GitLab needs it for pipeline lookups).
    pub id: u64,
    pub author: String,
    pub state: String,
    pub title: String,
    pub body: String,
    pub created_at: String,

    /// `owner:branch` style label of the source branch.
    pub head_label: String,
    /// `owner:branch` style label of the target branch.
    pub base_label: String,
    pub head_sha: String,
    pub base_sha: String,

    pub milestone: Option<String>,

    pub comments_count: i32,
    pub additions: i32,
    pub deletions: i32,
    pub commits: i32,
    pub changed_files: i32,

    /// GitLab only: id of the newest pipeline on the source branch.
    pub head_pipeline_id: i64,
    /// GitLab only: test coverage percentage as reported.
    pub coverage: Option<String>,

    pub labels: Vec<String>,
    pub reviewers: Vec<String>,

    pub merged: bool,
    pub mergeable: bool,
    pub draft: bool,
    pub automerge: bool,
}

/// A commit inside a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Commit {
    /// Abbreviated sha (8 characters) for display.
    pub sha: String,
    pub long_sha: String,
    pub message: String,
    pub date: String,
    pub author: String,
    pub email: String,
}

/// Server-side filters applied when listing pulls.
#[derive(Debug, Clone, Default)]
pub struct PullFilter {
    /// Include closed/merged pulls as well as open ones.
    pub all: bool,
    pub author: Option<String>,
    pub label: Option<String>,
    pub milestone: Option<String>,
}

/// Options for opening a new pull request.
#[derive(Debug, Clone, Default)]
pub struct SubmitPullOptions {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub body: String,
    /// Source, `owner:branch` on GitHub/Gitea, branch name on GitLab.
    pub from: String,
    /// Target branch name.
    pub to: String,
    pub reviewers: Vec<String>,
    pub draft: bool,
}

/// Behaviour switches for merging a pull request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeFlags {
    pub squash: bool,
    /// Delete the source branch after a successful merge.
    pub delete_source: bool,
}
