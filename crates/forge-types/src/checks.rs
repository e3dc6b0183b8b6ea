//! CI results attached to a pull, polymorphic across forges.

use serde::Serialize;

/// A GitHub-style check run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Check {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub conclusion: String,
    pub started_at: String,
    pub completed_at: String,
}

/// A GitLab pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pipeline {
    pub id: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    /// Git ref the pipeline ran against.
    pub refname: String,
    pub sha: String,
    pub source: String,
}

/// CI results for a pull request.
///
/// The variant is determined by the backend that produced the list;
/// readers must match on it before interpreting the items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "forge", content = "items", rename_all = "lowercase")]
pub enum PullChecks {
    GitHub(Vec<Check>),
    GitLab(Vec<Pipeline>),
}

impl PullChecks {
    /// Number of checks/pipelines in the list.
    pub fn len(&self) -> usize {
        match self {
            Self::GitHub(checks) => checks.len(),
            Self::GitLab(pipelines) => pipelines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
