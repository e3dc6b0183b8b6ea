//! Account notifications.

use serde::Serialize;

/// A single notification/todo item for the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Notification {
    /// Carried as a string: GitHub thread ids arrive as strings, GitLab
    /// todo ids are numeric and formatted on parse.
    pub id: String,
    pub title: String,
    /// Subject type, e.g. `Issue`, `PullRequest`, `MergeRequest`.
    pub kind: String,
    pub date: String,
    pub reason: Option<String>,
    /// `owner/name` of the repository the notification belongs to.
    pub repository: String,
}
