//! Issue -- the uniform shape for issues and Bugzilla bugs.

use serde::Serialize;

/// A single issue, normalized across backends.
///
/// Fields a backend cannot supply are left at their `Default` value; the
/// per-forge [`crate::quirks::IssueQuirks`] declare which ones those are so
/// that output layers can suppress them instead of printing zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub created_at: String,
    pub author: String,
    pub state: String,
    pub comments_count: i32,
    pub locked: bool,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,

    /// GitHub reports pull requests on its issues endpoint; this flag is
    /// how they are told apart. Always `false` on other backends.
    pub is_pr: bool,

    pub milestone: Option<String>,

    /// Web URL of the issue, where the backend reports one.
    pub url: Option<String>,

    /// Bugzilla only.
    pub product: Option<String>,
    /// Bugzilla only.
    pub component: Option<String>,
}

/// Server-side filters applied when listing issues.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Include closed issues as well as open ones.
    pub all: bool,
    pub author: Option<String>,
    pub label: Option<String>,
    /// Milestone name or numeric id, resolved per backend.
    pub milestone: Option<String>,
}

/// Options for creating a new issue.
#[derive(Debug, Clone, Default)]
pub struct SubmitIssueOptions {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub body: String,
    /// Bugzilla files bugs against a product/component pair instead of an
    /// owner/repo pair.
    pub product: Option<String>,
    pub component: Option<String>,
}
