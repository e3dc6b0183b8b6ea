//! GitHub backend.
//!
//! Also the workhorse for Gitea: its API is a clone of GitHub's v3
//! surface, so the Gitea backend calls into these modules wherever the
//! two dialects agree. Everything here resolves the API base from the
//! context, which points at the right host in either case.

pub(crate) mod checks;
pub(crate) mod comments;
pub(crate) mod forks;
pub(crate) mod issues;
pub(crate) mod labels;
pub(crate) mod milestones;
pub(crate) mod notifications;
pub(crate) mod pulls;
pub(crate) mod releases;
pub(crate) mod repos;
pub(crate) mod sshkeys;

use std::io::Write;
use std::path::Path;

use forge_http::ApiErrorFn;
use forge_json::Stream;
use forge_types::{
    Comment, Commit, Fork, Issue, IssueFilter, IssueQuirks, Label, MergeFlags, Milestone,
    MilestoneCreateOptions, MilestoneQuirks, NewRelease, Notification, Pull, PullChecks,
    PullFilter, PullQuirks, Release, Repo, RepoCreateOptions, SshKey, SubmitCommentOptions,
    SubmitIssueOptions, SubmitPullOptions, Visibility,
};

use crate::context::Context;
use crate::error::Result;
use crate::forge::Forge;
use crate::session::Session;

pub(crate) const USER_KEY: &str = "login";

/// Extracts the `message` field from a GitHub-style error body.
pub(crate) fn api_error(body: &str) -> Option<String> {
    let mut stream = Stream::new(body);
    let mut message = None;
    stream
        .object(|s, key| {
            if key == "message" {
                message = Some(s.string()?);
            } else {
                s.skip_value()?;
            }
            Ok(())
        })
        .ok()?;
    message
}

pub(crate) fn session(ctx: &Context) -> Result<Session<'_>> {
    Session::new(
        ctx,
        api_error,
        USER_KEY,
        ctx.token().map(|token| format!("token {token}")),
    )
}

/// The GitHub backend singleton.
pub struct Github;

impl Forge for Github {
    // -- Comments ------------------------------------------------------------

    fn get_issue_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
    ) -> Result<Vec<Comment>> {
        comments::get_comments(&session(ctx)?, owner, repo, issue)
    }

    fn get_pull_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Comment>> {
        // GitHub serves pull discussion through the issues endpoint.
        comments::get_comments(&session(ctx)?, owner, repo, pull)
    }

    fn submit_comment(&self, ctx: &Context, opts: &SubmitCommentOptions) -> Result<()> {
        comments::submit(&session(ctx)?, opts)
    }

    // -- Forks ---------------------------------------------------------------

    fn get_forks(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Fork>> {
        forks::get_forks(&session(ctx)?, owner, repo, max)
    }

    fn fork_create(&self, ctx: &Context, owner: &str, repo: &str, into: Option<&str>) -> Result<()> {
        forks::create(&session(ctx)?, owner, repo, into)
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
        issues::search(&session(ctx)?, owner, repo, filter, max)
    }

    fn get_issue_summary(&self, ctx: &Context, owner: &str, repo: &str, issue: u64)
        -> Result<Issue> {
        issues::get_summary(&session(ctx)?, owner, repo, issue)
    }

    fn issue_close(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        issues::patch_state(&session(ctx)?, owner, repo, issue, "closed")
    }

    fn issue_reopen(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        issues::patch_state(&session(ctx)?, owner, repo, issue, "open")
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
        issues::add_labels(&session(ctx)?, owner, repo, issue, labels)
    }

    fn issue_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<()> {
        issues::remove_labels(&session(ctx)?, owner, repo, issue, labels)
    }

    fn submit_issue(&self, ctx: &Context, opts: &SubmitIssueOptions) -> Result<Issue> {
        issues::submit(&session(ctx)?, opts)
    }

    fn issue_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        title: &str,
    ) -> Result<()> {
        issues::set_title(&session(ctx)?, owner, repo, issue, title)
    }

    fn issue_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        milestone: u64,
    ) -> Result<()> {
        issues::set_milestone(&session(ctx)?, owner, repo, issue, Some(milestone))
    }

    fn issue_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, issue: u64)
        -> Result<()> {
        issues::set_milestone(&session(ctx)?, owner, repo, issue, None)
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
        pulls::search(&session(ctx)?, owner, repo, filter, max)
    }

    fn get_pull(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<Pull> {
        pulls::get(&session(ctx)?, owner, repo, pull)
    }

    fn pull_get_diff(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        pulls::download(&session(ctx)?, owner, repo, pull, "application/vnd.github.v3.diff", out)
    }

    fn pull_get_patch(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        pulls::download(&session(ctx)?, owner, repo, pull, "application/vnd.github.v3.patch", out)
    }

    fn get_pull_checks(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<PullChecks> {
        checks::pull_checks(&session(ctx)?, owner, repo, pull)
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
        pulls::patch_state(&session(ctx)?, owner, repo, pull, "open")
    }

    fn pull_close(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        pulls::patch_state(&session(ctx)?, owner, repo, pull, "closed")
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
        pulls::commits(&session(ctx)?, owner, repo, pull)
    }

    fn pull_add_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        // Pulls are issues as far as labels are concerned.
        issues::add_labels(&session(ctx)?, owner, repo, pull, labels)
    }

    fn pull_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        issues::remove_labels(&session(ctx)?, owner, repo, pull, labels)
    }

    fn pull_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        milestone: u64,
    ) -> Result<()> {
        issues::set_milestone(&session(ctx)?, owner, repo, pull, Some(milestone))
    }

    fn pull_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<()> {
        issues::set_milestone(&session(ctx)?, owner, repo, pull, None)
    }

    fn pull_add_reviewer(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        username: &str,
    ) -> Result<()> {
        pulls::add_reviewer(&session(ctx)?, owner, repo, pull, username)
    }

    fn pull_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        title: &str,
    ) -> Result<()> {
        pulls::set_title(&session(ctx)?, owner, repo, pull, title)
    }

    // -- Releases ------------------------------------------------------------

    fn get_releases(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Release>> {
        releases::get_releases(&session(ctx)?, owner, repo, max)
    }

    fn create_release(&self, ctx: &Context, release: &NewRelease) -> Result<()> {
        releases::create(&session(ctx)?, release)
    }

    fn delete_release(&self, ctx: &Context, owner: &str, repo: &str, id: &str) -> Result<()> {
        releases::delete(&session(ctx)?, owner, repo, id)
    }

    // -- Labels --------------------------------------------------------------

    fn get_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Label>> {
        labels::get_labels(&session(ctx)?, owner, repo, max)
    }

    fn create_label(&self, ctx: &Context, owner: &str, repo: &str, label: &mut Label)
        -> Result<()> {
        labels::create(&session(ctx)?, owner, repo, label)
    }

    fn delete_label(&self, ctx: &Context, owner: &str, repo: &str, name: &str) -> Result<()> {
        labels::delete(&session(ctx)?, owner, repo, name)
    }

    // -- Repos ---------------------------------------------------------------

    fn get_repos(&self, ctx: &Context, owner: &str, max: Option<usize>) -> Result<Vec<Repo>> {
        repos::get_repos(&session(ctx)?, owner, max)
    }

    fn get_own_repos(&self, ctx: &Context, max: Option<usize>) -> Result<Vec<Repo>> {
        repos::get_own_repos(&session(ctx)?, max)
    }

    fn repo_create(&self, ctx: &Context, opts: &RepoCreateOptions) -> Result<Repo> {
        repos::create(&session(ctx)?, opts)
    }

    fn repo_delete(&self, ctx: &Context, owner: &str, repo: &str) -> Result<()> {
        repos::delete(&session(ctx)?, owner, repo)
    }

    fn repo_set_visibility(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        visibility: Visibility,
    ) -> Result<()> {
        repos::set_visibility(&session(ctx)?, owner, repo, visibility)
    }

    // -- SSH keys ------------------------------------------------------------

    fn get_sshkeys(&self, ctx: &Context) -> Result<Vec<SshKey>> {
        sshkeys::get_keys(&session(ctx)?)
    }

    fn add_sshkey(&self, ctx: &Context, title: &str, public_key_path: &Path) -> Result<SshKey> {
        sshkeys::add(&session(ctx)?, title, public_key_path)
    }

    fn delete_sshkey(&self, ctx: &Context, id: u64) -> Result<()> {
        sshkeys::delete(&session(ctx)?, id)
    }

    // -- Notifications -------------------------------------------------------

    fn get_notifications(&self, ctx: &Context, max: Option<usize>) -> Result<Vec<Notification>> {
        notifications::get_notifications(&session(ctx)?, max)
    }

    fn notification_mark_as_read(&self, ctx: &Context, id: &str) -> Result<()> {
        notifications::mark_as_read(&session(ctx)?, id)
    }

    // -- Internal ------------------------------------------------------------

    fn make_auth_header(&self, token: &str) -> Option<String> {
        Some(format!("token {token}"))
    }

    fn api_error_fn(&self) -> ApiErrorFn {
        api_error
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
            coverage: true,
            automerge: true,
            ..PullQuirks::default()
        }
    }

    fn milestone_quirks(&self) -> MilestoneQuirks {
        MilestoneQuirks {
            expired: true,
            due_date: true,
            pulls: true,
            ..MilestoneQuirks::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_extracts_message() {
        assert_eq!(
            api_error(r#"{"message": "Not Found", "documentation_url": "https://x"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(api_error("not json"), None);
        assert_eq!(api_error(r#"{"error": "other shape"}"#), None);
    }
}
