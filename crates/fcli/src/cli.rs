//! Clap CLI definitions for the `fcli` command.

use clap::{Args, Parser, Subcommand};

/// fcli -- one CLI for GitHub, GitLab, Gitea and Bugzilla.
#[derive(Parser, Debug)]
#[command(
    name = "fcli",
    about = "Uniform command-line client for software forges",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Account from the config file to use (default: $FCLI_ACCOUNT,
    /// repo .fcli file, config default).
    #[arg(short = 'a', long, global = true, env = "FCLI_ACCOUNT")]
    pub account: Option<String>,

    /// Forge type override: github, gitlab, gitea or bugzilla.
    #[arg(short = 't', long = "forge", global = true)]
    pub forge: Option<String>,

    /// Git remote to infer the forge and owner/repo from.
    #[arg(long, global = true)]
    pub remote: Option<String>,

    /// Repository owner (default: inferred from the git remote).
    /// On Bugzilla this selects the product.
    #[arg(short = 'o', long, global = true)]
    pub owner: Option<String>,

    /// Repository name (default: inferred from the git remote).
    /// On Bugzilla this selects the component.
    #[arg(short = 'r', long, global = true)]
    pub repo: Option<String>,

    /// Output JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output on stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with issues (bugs on Bugzilla).
    Issues(IssuesArgs),

    /// Work with pull/merge requests.
    Pulls(PullsArgs),

    /// Manage labels in a repository.
    Labels(LabelsArgs),

    /// Manage milestones.
    Milestones(MilestonesArgs),

    /// Manage releases.
    Releases(ReleasesArgs),

    /// List, create and delete repositories.
    Repos(ReposArgs),

    /// List forks or fork a repository.
    Forks(ForksArgs),

    /// Comment on an issue or pull request.
    Comment(CommentArgs),

    /// List notifications and mark them read.
    Notifications(NotificationsArgs),

    /// Show CI results for a pull request.
    Checks(ChecksArgs),

    /// Work with issue attachments (Bugzilla).
    Attachments(AttachmentsArgs),

    /// Manage SSH keys of the account.
    Keys(KeysArgs),

    /// Perform a raw GET against the forge API (debugging).
    Api(ApiArgs),
}

// ---------------------------------------------------------------------------
// Shared bits
// ---------------------------------------------------------------------------

/// List sizing shared by list-style commands.
#[derive(Args, Debug, Clone)]
pub struct ListLimit {
    /// Maximum number of items to fetch.
    #[arg(short = 'n', long = "count", default_value_t = 30)]
    pub count: usize,

    /// Fetch every page.
    #[arg(long, conflicts_with = "count")]
    pub all_pages: bool,
}

impl ListLimit {
    pub fn max(&self) -> Option<usize> {
        if self.all_pages { None } else { Some(self.count) }
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct IssuesArgs {
    #[command(subcommand)]
    pub action: IssuesAction,
}

#[derive(Subcommand, Debug)]
pub enum IssuesAction {
    /// List issues.
    List(IssuesListArgs),

    /// Show one issue with its details.
    View {
        id: u64,
        /// Also print the comment thread.
        #[arg(long)]
        comments: bool,
    },

    /// Create a new issue.
    Create {
        title: String,
        /// Issue body text.
        #[arg(short = 'm', long, default_value = "")]
        message: String,
    },

    /// Close an issue.
    Close { id: u64 },

    /// Reopen an issue.
    Reopen { id: u64 },

    /// Assign an issue to a user.
    Assign { id: u64, user: String },

    /// Change the title of an issue.
    Title { id: u64, new_title: String },

    /// Add labels to an issue.
    Label {
        id: u64,
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Remove labels from an issue.
    Unlabel {
        id: u64,
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Set or clear the milestone of an issue.
    Milestone {
        id: u64,
        /// Milestone id to assign; omit together with --clear.
        milestone: Option<u64>,
        /// Remove the milestone instead.
        #[arg(long, conflicts_with = "milestone")]
        clear: bool,
    },
}

#[derive(Args, Debug)]
pub struct IssuesListArgs {
    /// Include closed issues.
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Only issues created by this user.
    #[arg(long)]
    pub author: Option<String>,

    /// Only issues carrying this label.
    #[arg(long)]
    pub label: Option<String>,

    /// Only issues in this milestone (name or id).
    #[arg(long)]
    pub milestone: Option<String>,

    #[command(flatten)]
    pub limit: ListLimit,
}

// ---------------------------------------------------------------------------
// Pulls
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct PullsArgs {
    #[command(subcommand)]
    pub action: PullsAction,
}

#[derive(Subcommand, Debug)]
pub enum PullsAction {
    /// List pull requests.
    List(PullsListArgs),

    /// Show one pull request.
    View {
        id: u64,
        /// Also print the comment thread.
        #[arg(long)]
        comments: bool,
    },

    /// Print the diff of a pull request.
    Diff { id: u64 },

    /// Print the patch series of a pull request.
    Patch { id: u64 },

    /// List the commits of a pull request.
    Commits { id: u64 },

    /// Open a new pull request.
    Create {
        title: String,
        /// Source branch (`owner:branch` across forks).
        #[arg(long)]
        from: String,
        /// Target branch (default: repo .fcli `pr.base`).
        #[arg(long)]
        to: Option<String>,
        /// Body text.
        #[arg(short = 'm', long, default_value = "")]
        message: String,
        /// Open as draft.
        #[arg(long)]
        draft: bool,
        /// Request a review from these users.
        #[arg(long = "reviewer")]
        reviewers: Vec<String>,
    },

    /// Merge a pull request.
    Merge {
        id: u64,
        /// Squash-merge instead of creating a merge commit.
        #[arg(long)]
        squash: bool,
        /// Delete the source branch after merging.
        #[arg(short = 'D', long)]
        delete_branch: bool,
    },

    /// Close a pull request.
    Close { id: u64 },

    /// Reopen a pull request.
    Reopen { id: u64 },

    /// Change the title of a pull request.
    Title { id: u64, new_title: String },

    /// Add labels to a pull request.
    Label {
        id: u64,
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Remove labels from a pull request.
    Unlabel {
        id: u64,
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Set or clear the milestone of a pull request.
    Milestone {
        id: u64,
        milestone: Option<u64>,
        #[arg(long, conflicts_with = "milestone")]
        clear: bool,
    },

    /// Request a review from a user.
    Reviewer { id: u64, user: String },
}

#[derive(Args, Debug)]
pub struct PullsListArgs {
    /// Include closed and merged pulls.
    #[arg(short = 'A', long)]
    pub all: bool,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub milestone: Option<String>,

    #[command(flatten)]
    pub limit: ListLimit,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub action: LabelsAction,
}

#[derive(Subcommand, Debug)]
pub enum LabelsAction {
    /// List labels defined in the repository.
    List {
        #[command(flatten)]
        limit: ListLimit,
    },

    /// Create a label.
    Create {
        name: String,
        /// Label colour as RRGGBB hex.
        #[arg(short = 'c', long, default_value = "cccccc")]
        color: String,
        #[arg(short = 'd', long, default_value = "")]
        description: String,
    },

    /// Delete a label.
    Delete { name: String },
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct MilestonesArgs {
    #[command(subcommand)]
    pub action: MilestonesAction,
}

#[derive(Subcommand, Debug)]
pub enum MilestonesAction {
    /// List milestones.
    List {
        #[command(flatten)]
        limit: ListLimit,
    },

    /// Show one milestone.
    View { id: u64 },

    /// List the issues attached to a milestone.
    Issues { id: u64 },

    /// Create a milestone.
    Create {
        title: String,
        #[arg(short = 'd', long, default_value = "")]
        description: String,
    },

    /// Delete a milestone.
    Delete { id: u64 },

    /// Set the due date (YYYY-MM-DD).
    Duedate { id: u64, date: String },
}

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ReleasesArgs {
    #[command(subcommand)]
    pub action: ReleasesAction,
}

#[derive(Subcommand, Debug)]
pub enum ReleasesAction {
    /// List releases.
    List {
        #[command(flatten)]
        limit: ListLimit,
    },

    /// Create a release.
    Create {
        /// Tag to release.
        tag: String,
        /// Release title (defaults to the tag).
        #[arg(long)]
        name: Option<String>,
        #[arg(short = 'm', long, default_value = "")]
        message: String,
        /// Commitish to tag if the tag does not exist yet.
        #[arg(long)]
        commitish: Option<String>,
        #[arg(long)]
        draft: bool,
        #[arg(long)]
        prerelease: bool,
        /// Files to upload as release assets.
        #[arg(short = 'A', long = "asset")]
        assets: Vec<String>,
    },

    /// Delete a release by id (tag name on GitLab).
    Delete { id: String },
}

// ---------------------------------------------------------------------------
// Repos / forks
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ReposArgs {
    #[command(subcommand)]
    pub action: ReposAction,
}

#[derive(Subcommand, Debug)]
pub enum ReposAction {
    /// List repositories of an owner (or your own without --owner).
    List {
        #[command(flatten)]
        limit: ListLimit,
    },

    /// Create a repository under the account.
    Create {
        name: String,
        #[arg(short = 'd', long, default_value = "")]
        description: String,
        #[arg(long)]
        private: bool,
    },

    /// Delete the repository.
    Delete {
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Change repository visibility.
    Visibility {
        /// `public` or `private`.
        level: String,
    },
}

#[derive(Args, Debug)]
pub struct ForksArgs {
    #[command(subcommand)]
    pub action: ForksAction,
}

#[derive(Subcommand, Debug)]
pub enum ForksAction {
    /// List forks of the repository.
    List {
        #[command(flatten)]
        limit: ListLimit,
    },

    /// Fork the repository.
    Create {
        /// Organisation/namespace to fork into.
        #[arg(long)]
        into: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Comments, notifications, checks, attachments, keys, api
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Issue number to comment on.
    #[arg(short = 'i', long, conflicts_with = "pull")]
    pub issue: Option<u64>,

    /// Pull request number to comment on.
    #[arg(short = 'p', long)]
    pub pull: Option<u64>,

    /// Comment text.
    #[arg(short = 'm', long)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub action: NotificationsAction,
}

#[derive(Subcommand, Debug)]
pub enum NotificationsAction {
    /// List notifications.
    List {
        #[command(flatten)]
        limit: ListLimit,
    },

    /// Mark a notification as read.
    Read { id: String },
}

#[derive(Args, Debug)]
pub struct ChecksArgs {
    /// Pull request number.
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct AttachmentsArgs {
    #[command(subcommand)]
    pub action: AttachmentsAction,
}

#[derive(Subcommand, Debug)]
pub enum AttachmentsAction {
    /// List attachments of an issue.
    List { issue: u64 },

    /// Dump the content of an attachment.
    Get {
        id: u64,
        /// Write to this file instead of stdout.
        #[arg(short = 'O', long)]
        output: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub action: KeysAction,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// List registered SSH keys.
    List,

    /// Register an SSH public key.
    Add {
        title: String,
        /// Path to the public key file.
        path: String,
    },

    /// Delete an SSH key by id.
    Delete { id: u64 },
}

#[derive(Args, Debug)]
pub struct ApiArgs {
    /// Path relative to the API base, e.g. `/repos/o/r/issues`.
    pub path: String,
}
