//! Milestones.

use serde::Serialize;

/// A milestone, normalized across backends.
///
/// Backends that cannot report a field leave it at its default; see
/// [`crate::quirks::MilestoneQuirks`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
    pub description: String,
    pub due_date: Option<String>,
    pub expired: bool,
    pub open_issues: i32,
    pub closed_issues: i32,
}

/// Options for creating a milestone.
#[derive(Debug, Clone, Default)]
pub struct MilestoneCreateOptions {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub description: String,
}
