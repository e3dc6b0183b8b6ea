//! Gitea backend.
//!
//! Gitea's REST surface is a faithful clone of the GitHub v3 API, so
//! most operations delegate straight into the `github` modules (the API
//! base resolved from the context already points at the Gitea host, and
//! the error body shape matches too). What differs is kept here: label
//! operations address labels by numeric id, milestones are keyed by
//! `id` instead of `number`, merging and pull submission have their own
//! payloads, release assets go up as multipart forms, and the user key
//! is `username`.

pub(crate) mod issues;
pub(crate) mod labels;
pub(crate) mod milestones;
pub(crate) mod pulls;
pub(crate) mod releases;
pub(crate) mod repos;

use std::io::Write;
use std::path::Path;

use forge_http::ApiErrorFn;
use forge_types::{
    Comment, Commit, Fork, Issue, IssueFilter, IssueQuirks, Label, MergeFlags, Milestone,
    MilestoneCreateOptions, MilestoneQuirks, NewRelease, Notification, Pull, PullFilter,
    PullQuirks, Release, Repo, RepoCreateOptions, SshKey, SubmitCommentOptions,
    SubmitIssueOptions, SubmitPullOptions, Visibility,
};

use crate::context::Context;
use crate::error::Result;
use crate::forge::Forge;
use crate::github;
use crate::session::Session;

pub(crate) const USER_KEY: &str = "username";

pub(crate) fn session(ctx: &Context) -> Result<Session<'_>> {
    // Gitea reports errors in the GitHub shape; reuse that extractor.
    Session::new(
        ctx,
        github::api_error,
        USER_KEY,
        ctx.token().map(|token| format!("token {token}")),
    )
}

/// The Gitea backend singleton.
pub struct Gitea;

impl Forge for Gitea {
    // -- Comments ------------------------------------------------------------

    fn get_issue_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
    ) -> Result<Vec<Comment>> {
        github::comments::get_comments(&session(ctx)?, owner, repo, issue)
    }

    fn get_pull_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Comment>> {
        github::comments::get_comments(&session(ctx)?, owner, repo, pull)
    }

    fn submit_comment(&self, ctx: &Context, opts: &SubmitCommentOptions) -> Result<()> {
        github::comments::submit(&session(ctx)?, opts)
    }

    // -- Forks ---------------------------------------------------------------

    fn get_forks(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Fork>> {
        github::forks::get_forks(&session(ctx)?, owner, repo, max)
    }

    fn fork_create(&self, ctx: &Context, owner: &str, repo: &str, into: Option<&str>) -> Result<()> {
        github::forks::create(&session(ctx)?, owner, repo, into)
    }

    // -- Issues --------------------------------------------------------------

    fn search_issues(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
        max: Option<usize>,
    ) -> Result<Vec<Issue>> {
        github::issues::search(&session(ctx)?, owner, repo, filter, max)
    }

    fn get_issue_summary(&self, ctx: &Context, owner: &str, repo: &str, issue: u64)
        -> Result<Issue> {
        github::issues::get_summary(&session(ctx)?, owner, repo, issue)
    }

    fn issue_close(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        github::issues::patch_state(&session(ctx)?, owner, repo, issue, "closed")
    }

    fn issue_reopen(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        github::issues::patch_state(&session(ctx)?, owner, repo, issue, "open")
    }

    fn issue_assign(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        assignee: &str,
    ) -> Result<()> {
        issues::assign(&session(ctx)?, owner, repo, issue, assignee)
    }

    fn issue_add_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<()> {
        labels::add_to_issue(&session(ctx)?, owner, repo, issue, labels)
    }

    fn issue_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<()> {
        labels::remove_from_issue(&session(ctx)?, owner, repo, issue, labels)
    }

    fn submit_issue(&self, ctx: &Context, opts: &SubmitIssueOptions) -> Result<Issue> {
        github::issues::submit(&session(ctx)?, opts)
    }

    fn issue_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        title: &str,
    ) -> Result<()> {
        github::issues::set_title(&session(ctx)?, owner, repo, issue, title)
    }

    fn issue_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        milestone: u64,
    ) -> Result<()> {
        github::issues::set_milestone(&session(ctx)?, owner, repo, issue, Some(milestone))
    }

    fn issue_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, issue: u64)
        -> Result<()> {
        // Gitea clears with milestone id 0 rather than null.
        github::issues::set_milestone(&session(ctx)?, owner, repo, issue, Some(0))
    }

    // -- Milestones ----------------------------------------------------------

    fn get_milestones(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Milestone>> {
        milestones::get_milestones(&session(ctx)?, owner, repo, max)
    }

    fn get_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        milestone: u64,
    ) -> Result<Milestone> {
        milestones::get_milestone(&session(ctx)?, owner, repo, milestone)
    }

    fn create_milestone(&self, ctx: &Context, opts: &MilestoneCreateOptions) -> Result<()> {
        milestones::create(&session(ctx)?, opts)
    }

    fn delete_milestone(&self, ctx: &Context, owner: &str, repo: &str, milestone: u64)
        -> Result<()> {
        milestones::delete(&session(ctx)?, owner, repo, milestone)
    }

    fn milestone_set_duedate(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        milestone: u64,
        date: &str,
    ) -> Result<()> {
        milestones::set_duedate(&session(ctx)?, owner, repo, milestone, date)
    }

    fn get_milestone_issues(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        milestone: u64,
    ) -> Result<Vec<Issue>> {
        milestones::get_issues(&session(ctx)?, owner, repo, milestone)
    }

    // -- Pulls ---------------------------------------------------------------

    fn search_pulls(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        filter: &PullFilter,
        max: Option<usize>,
    ) -> Result<Vec<Pull>> {
        github::pulls::search(&session(ctx)?, owner, repo, filter, max)
    }

    fn get_pull(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<Pull> {
        github::pulls::get(&session(ctx)?, owner, repo, pull)
    }

    fn pull_get_diff(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        pulls::download(&session(ctx)?, owner, repo, pull, "diff", out)
    }

    fn pull_get_patch(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        pulls::download(&session(ctx)?, owner, repo, pull, "patch", out)
    }

    fn pull_merge(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        flags: MergeFlags,
    ) -> Result<()> {
        pulls::merge(&session(ctx)?, owner, repo, pull, flags)
    }

    fn pull_reopen(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        github::pulls::patch_state(&session(ctx)?, owner, repo, pull, "open")
    }

    fn pull_close(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        github::pulls::patch_state(&session(ctx)?, owner, repo, pull, "closed")
    }

    fn submit_pull(&self, ctx: &Context, opts: &SubmitPullOptions) -> Result<()> {
        pulls::submit(&session(ctx)?, opts)
    }

    fn get_pull_commits(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Commit>> {
        github::pulls::commits(&session(ctx)?, owner, repo, pull)
    }

    fn pull_add_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        labels::add_to_issue(&session(ctx)?, owner, repo, pull, labels)
    }

    fn pull_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        labels::remove_from_issue(&session(ctx)?, owner, repo, pull, labels)
    }

    fn pull_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        milestone: u64,
    ) -> Result<()> {
        github::issues::set_milestone(&session(ctx)?, owner, repo, pull, Some(milestone))
    }

    fn pull_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<()> {
        github::issues::set_milestone(&session(ctx)?, owner, repo, pull, Some(0))
    }

    fn pull_add_reviewer(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        username: &str,
    ) -> Result<()> {
        github::pulls::add_reviewer(&session(ctx)?, owner, repo, pull, username)
    }

    fn pull_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        title: &str,
    ) -> Result<()> {
        github::pulls::set_title(&session(ctx)?, owner, repo, pull, title)
    }

    // -- Releases ------------------------------------------------------------

    fn get_releases(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Release>> {
        github::releases::get_releases(&session(ctx)?, owner, repo, max)
    }

    fn create_release(&self, ctx: &Context, release: &NewRelease) -> Result<()> {
        releases::create(&session(ctx)?, release)
    }

    fn delete_release(&self, ctx: &Context, owner: &str, repo: &str, id: &str) -> Result<()> {
        github::releases::delete(&session(ctx)?, owner, repo, id)
    }

    // -- Labels --------------------------------------------------------------

    fn get_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Label>> {
        github::labels::get_labels(&session(ctx)?, owner, repo, max)
    }

    fn create_label(&self, ctx: &Context, owner: &str, repo: &str, label: &mut Label)
        -> Result<()> {
        github::labels::create(&session(ctx)?, owner, repo, label)
    }

    fn delete_label(&self, ctx: &Context, owner: &str, repo: &str, name: &str) -> Result<()> {
        labels::delete(&session(ctx)?, owner, repo, name)
    }

    // -- Repos ---------------------------------------------------------------

    fn get_repos(&self, ctx: &Context, owner: &str, max: Option<usize>) -> Result<Vec<Repo>> {
        github::repos::get_repos(&session(ctx)?, owner, max)
    }

    fn get_own_repos(&self, ctx: &Context, max: Option<usize>) -> Result<Vec<Repo>> {
        github::repos::get_own_repos(&session(ctx)?, max)
    }

    fn repo_create(&self, ctx: &Context, opts: &RepoCreateOptions) -> Result<Repo> {
        github::repos::create(&session(ctx)?, opts)
    }

    fn repo_delete(&self, ctx: &Context, owner: &str, repo: &str) -> Result<()> {
        github::repos::delete(&session(ctx)?, owner, repo)
    }

    fn repo_set_visibility(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        visibility: Visibility,
    ) -> Result<()> {
        // Gitea has no visibility string; it toggles a private flag.
        repos::set_private(
            &session(ctx)?,
            owner,
            repo,
            visibility == Visibility::Private,
        )
    }

    // -- SSH keys ------------------------------------------------------------

    fn get_sshkeys(&self, ctx: &Context) -> Result<Vec<SshKey>> {
        github::sshkeys::get_keys(&session(ctx)?)
    }

    fn add_sshkey(&self, ctx: &Context, title: &str, public_key_path: &Path) -> Result<SshKey> {
        github::sshkeys::add(&session(ctx)?, title, public_key_path)
    }

    fn delete_sshkey(&self, ctx: &Context, id: u64) -> Result<()> {
        github::sshkeys::delete(&session(ctx)?, id)
    }

    // -- Notifications -------------------------------------------------------

    fn get_notifications(&self, ctx: &Context, max: Option<usize>) -> Result<Vec<Notification>> {
        github::notifications::get_notifications(&session(ctx)?, max)
    }

    fn notification_mark_as_read(&self, ctx: &Context, id: &str) -> Result<()> {
        github::notifications::mark_as_read(&session(ctx)?, id)
    }

    // -- Internal ------------------------------------------------------------

    fn make_auth_header(&self, token: &str) -> Option<String> {
        Some(format!("token {token}"))
    }

    fn api_error_fn(&self) -> ApiErrorFn {
        github::api_error
    }

    fn user_object_key(&self) -> &'static str {
        USER_KEY
    }

    // -- Quirks --------------------------------------------------------------

    fn issue_quirks(&self) -> IssueQuirks {
        IssueQuirks {
            product_component: true,
            url: true,
            attachments: true,
            ..IssueQuirks::default()
        }
    }

    fn pull_quirks(&self) -> PullQuirks {
        PullQuirks {
            additions_deletions: true,
            commits: true,
            changed_files: true,
            draft: true,
            coverage: true,
            automerge: true,
            ..PullQuirks::default()
        }
    }

    fn milestone_quirks(&self) -> MilestoneQuirks {
        MilestoneQuirks {
            expired: true,
            pulls: true,
            ..MilestoneQuirks::default()
        }
    }
}
