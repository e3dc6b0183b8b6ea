//! Quirk sets -- per-forge declarations of API gaps.
//!
//! A `true` flag means the backend does *not* deliver that field;
//! adapters leave it default-initialized and output layers consult the
//! quirks to suppress it. The concrete values live with each backend.

/// Issue fields a backend cannot supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueQuirks {
    pub locked: bool,
    pub comments_count: bool,
    pub product_component: bool,
    pub url: bool,
    pub attachments: bool,
}

/// Pull-summary fields a backend cannot supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullQuirks {
    pub additions_deletions: bool,
    pub commits: bool,
    pub changed_files: bool,
    pub merged: bool,
    pub draft: bool,
    pub coverage: bool,
    pub automerge: bool,
}

/// Milestone fields a backend cannot supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestoneQuirks {
    pub expired: bool,
    pub due_date: bool,
    pub pulls: bool,
    pub issue_counts: bool,
}
