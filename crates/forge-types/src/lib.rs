//! Normalized domain model for the forgecli system.
//!
//! Every backend translates its wire dialect into the types defined here,
//! so that callers never see a GitHub issue, a GitLab merge request or a
//! Bugzilla bug -- only the common shapes. All entity fields are owned;
//! timestamps are carried verbatim as the strings the forge returned.

pub mod attachment;
pub mod checks;
pub mod comment;
pub mod issue;
pub mod kind;
pub mod label;
pub mod milestone;
pub mod notification;
pub mod pull;
pub mod quirks;
pub mod release;
pub mod repo;
pub mod sshkey;

pub use attachment::Attachment;
pub use checks::{Check, Pipeline, PullChecks};
pub use comment::{Comment, CommentTarget, SubmitCommentOptions};
pub use issue::{Issue, IssueFilter, SubmitIssueOptions};
pub use kind::ForgeKind;
pub use label::Label;
pub use milestone::{Milestone, MilestoneCreateOptions};
pub use notification::Notification;
pub use pull::{Commit, MergeFlags, Pull, PullFilter, SubmitPullOptions};
pub use quirks::{IssueQuirks, MilestoneQuirks, PullQuirks};
pub use release::{NewRelease, Release, ReleaseAsset, ReleaseAssetUpload};
pub use repo::{Fork, Repo, RepoCreateOptions, Visibility};
pub use sshkey::SshKey;
