//! GitLab backend.
//!
//! GitLab addresses repositories as projects; the `owner/repo` pair is
//! urlencoded into a single path component (`owner%2Frepo`). Several
//! operations need numeric ids (users, target projects) that the uniform
//! surface does not carry, so this backend resolves them with extra
//! requests.

pub(crate) mod issues;
pub(crate) mod labels;
pub(crate) mod merge_requests;
pub(crate) mod milestones;
pub(crate) mod notifications;
pub(crate) mod pipelines;
pub(crate) mod releases;
pub(crate) mod repos;
pub(crate) mod sshkeys;

use std::io::Write;
use std::path::Path;

use forge_http::{urlencode, ApiErrorFn};
use forge_json::{EventKind, Stream};
use forge_types::{
    Comment, Commit, Fork, Issue, IssueFilter, IssueQuirks, Label, MergeFlags, Milestone,
    MilestoneCreateOptions, MilestoneQuirks, NewRelease, Notification, Pull, PullChecks,
    PullFilter, PullQuirks, Release, Repo, RepoCreateOptions, SshKey, SubmitCommentOptions,
    SubmitIssueOptions, SubmitPullOptions, Visibility,
};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::forge::Forge;
use crate::session::Session;

pub(crate) const USER_KEY: &str = "username";

/// GitLab errors come as `{"message": ...}` or `{"error": "..."}`; the
/// message may be a nested structure, in which case it is skipped.
pub(crate) fn api_error(body: &str) -> Option<String> {
    let mut stream = Stream::new(body);
    let mut message = None;
    stream
        .object(|s, key| {
            match key {
                "message" | "error" if message.is_none() => {
                    if s.peek_kind()? == EventKind::Str {
                        message = Some(s.string()?);
                    } else {
                        s.skip_value()?;
                    }
                }
                _ => s.skip_value()?,
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
        ctx.token().map(|token| format!("Bearer {token}")),
    )
}

/// Single urlencoded path component addressing a project.
pub(crate) fn project_path(owner: &str, repo: &str) -> String {
    format!("{}%2F{}", urlencode(owner), urlencode(repo))
}

/// Resolves a username to its numeric id via `/users?username=`.
pub(crate) fn user_id(session: &Session<'_>, username: &str) -> Result<u64> {
    let url = format!("{}/users?username={}", session.base(), urlencode(username));
    let mut id = None;
    session.get_parsed(&url, |s| {
        s.array(|s| {
            s.object(|s, key| {
                if key == "id" && id.is_none() {
                    id = Some(s.uint()?);
                } else {
                    s.skip_value()?;
                }
                Ok(())
            })
        })?;
        Ok(())
    })?;
    id.ok_or_else(|| Error::input(format!("{username}: no such user")))
}

/// The GitLab backend singleton.
pub struct Gitlab;

impl Forge for Gitlab {
    // -- Comments ------------------------------------------------------------

    fn get_issue_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
    ) -> Result<Vec<Comment>> {
        issues::get_comments(&session(ctx)?, owner, repo, issue)
    }

    fn get_pull_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Comment>> {
        merge_requests::get_comments(&session(ctx)?, owner, repo, pull)
    }

    fn submit_comment(&self, ctx: &Context, opts: &SubmitCommentOptions) -> Result<()> {
        issues::submit_comment(&session(ctx)?, opts)
    }

    // -- Forks ---------------------------------------------------------------

    fn get_forks(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Fork>> {
        repos::get_forks(&session(ctx)?, owner, repo, max)
    }

    fn fork_create(&self, ctx: &Context, owner: &str, repo: &str, into: Option<&str>) -> Result<()> {
        repos::fork_create(&session(ctx)?, owner, repo, into)
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
        issues::state_event(&session(ctx)?, owner, repo, issue, "close")
    }

    fn issue_reopen(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        issues::state_event(&session(ctx)?, owner, repo, issue, "reopen")
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
        issues::change_labels(&session(ctx)?, owner, repo, issue, "add_labels", labels)
    }

    fn issue_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<()> {
        issues::change_labels(&session(ctx)?, owner, repo, issue, "remove_labels", labels)
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
        // The documented `milestone_id: 0` is accepted but ignored by
        // the API; null does what the documentation promises.
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
        merge_requests::search(&session(ctx)?, owner, repo, filter, max)
    }

    fn get_pull(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<Pull> {
        merge_requests::get(&session(ctx)?, owner, repo, pull)
    }

    fn pull_get_diff(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        merge_requests::download_diff(&session(ctx)?, owner, repo, pull, out)
    }

    fn pull_get_patch(
        &self,
        _ctx: &Context,
        _out: &mut dyn Write,
        _owner: &str,
        _repo: &str,
        _pull: u64,
    ) -> Result<()> {
        Err(Error::input(
            "GitLab does not provide patch series for merge requests",
        ))
    }

    fn get_pull_checks(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<PullChecks> {
        merge_requests::pipelines(&session(ctx)?, owner, repo, pull)
    }

    fn pull_merge(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        flags: MergeFlags,
    ) -> Result<()> {
        merge_requests::merge(&session(ctx)?, owner, repo, pull, flags)
    }

    fn pull_reopen(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        merge_requests::state_event(&session(ctx)?, owner, repo, pull, "reopen")
    }

    fn pull_close(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        merge_requests::state_event(&session(ctx)?, owner, repo, pull, "close")
    }

    fn submit_pull(&self, ctx: &Context, opts: &SubmitPullOptions) -> Result<()> {
        merge_requests::submit(&session(ctx)?, opts)
    }

    fn get_pull_commits(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Commit>> {
        merge_requests::commits(&session(ctx)?, owner, repo, pull)
    }

    fn pull_add_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        merge_requests::change_labels(&session(ctx)?, owner, repo, pull, "add_labels", labels)
    }

    fn pull_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        merge_requests::change_labels(&session(ctx)?, owner, repo, pull, "remove_labels", labels)
    }

    fn pull_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        milestone: u64,
    ) -> Result<()> {
        merge_requests::set_milestone(&session(ctx)?, owner, repo, pull, Some(milestone))
    }

    fn pull_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<()> {
        merge_requests::set_milestone(&session(ctx)?, owner, repo, pull, None)
    }

    fn pull_add_reviewer(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        username: &str,
    ) -> Result<()> {
        merge_requests::add_reviewer(&session(ctx)?, owner, repo, pull, username)
    }

    fn pull_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        title: &str,
    ) -> Result<()> {
        merge_requests::set_title(&session(ctx)?, owner, repo, pull, title)
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
        notifications::get_todos(&session(ctx)?, max)
    }

    fn notification_mark_as_read(&self, ctx: &Context, id: &str) -> Result<()> {
        notifications::mark_as_done(&session(ctx)?, id)
    }

    // -- Internal ------------------------------------------------------------

    fn make_auth_header(&self, token: &str) -> Option<String> {
        Some(format!("Bearer {token}"))
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
            additions_deletions: true,
            commits: true,
            changed_files: true,
            merged: true,
            ..PullQuirks::default()
        }
    }

    fn milestone_quirks(&self) -> MilestoneQuirks {
        MilestoneQuirks {
            issue_counts: true,
            ..MilestoneQuirks::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn api_error_string_shapes() {
        assert_eq!(
            api_error(r#"{"message": "404 Project Not Found"}"#).as_deref(),
            Some("404 Project Not Found")
        );
        assert_eq!(
            api_error(r#"{"error": "insufficient_scope"}"#).as_deref(),
            Some("insufficient_scope")
        );
        // Structured messages are skipped rather than mangled.
        assert_eq!(api_error(r#"{"message": {"base": ["taken"]}}"#), None);
    }

    #[test]
    fn project_paths_are_encoded() {
        assert_eq!(project_path("owner", "repo"), "owner%2Frepo");
        assert_eq!(project_path("group/sub", "repo"), "group%2Fsub%2Frepo");
    }
}
