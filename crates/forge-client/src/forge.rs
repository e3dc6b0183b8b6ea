//! The `Forge` trait -- the uniform operation set over all backends.
//!
//! Every method is default-implemented to fail with
//! `"<op> is not available on this forge"`; backends override what their
//! API can express. Callers consult the quirk sets before rendering
//! fields a backend cannot deliver.

use std::io::Write;
use std::path::Path;

use forge_http::ApiErrorFn;
use forge_types::{
    Attachment, Comment, Commit, ForgeKind, Fork, Issue, IssueFilter, IssueQuirks, Label,
    MergeFlags, Milestone, MilestoneCreateOptions, MilestoneQuirks, NewRelease, Notification,
    Pull, PullChecks, PullFilter, PullQuirks, Release, Repo, RepoCreateOptions, SshKey,
    SubmitCommentOptions, SubmitIssueOptions, SubmitPullOptions, Visibility,
};

use crate::context::Context;
use crate::error::{Error, Result};

/// Uniform operations over a forge. One implementation per backend.
#[allow(unused_variables)]
pub trait Forge: Sync {
    // -- Comments ------------------------------------------------------------

    /// Lists comments on the given issue.
    fn get_issue_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
    ) -> Result<Vec<Comment>> {
        Err(Error::Unsupported("get_issue_comments"))
    }

    /// Lists comments on the given pull.
    fn get_pull_comments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Comment>> {
        Err(Error::Unsupported("get_pull_comments"))
    }

    /// Submits a comment to an issue or pull.
    fn submit_comment(&self, ctx: &Context, opts: &SubmitCommentOptions) -> Result<()> {
        Err(Error::Unsupported("submit_comment"))
    }

    // -- Forks ---------------------------------------------------------------

    /// Lists forks of the given repo.
    fn get_forks(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Fork>> {
        Err(Error::Unsupported("get_forks"))
    }

    /// Forks the given repo, optionally into another owner/organisation.
    fn fork_create(&self, ctx: &Context, owner: &str, repo: &str, into: Option<&str>) -> Result<()> {
        Err(Error::Unsupported("fork_create"))
    }

    // -- Issues --------------------------------------------------------------

    /// Lists issues matching the filter.
    fn search_issues(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
        max: Option<usize>,
    ) -> Result<Vec<Issue>> {
        Err(Error::Unsupported("search_issues"))
    }

    /// Fetches the summary of a single issue.
    fn get_issue_summary(&self, ctx: &Context, owner: &str, repo: &str, issue: u64)
        -> Result<Issue> {
        Err(Error::Unsupported("get_issue_summary"))
    }

    /// Lists attachments of an issue.
    fn get_issue_attachments(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
    ) -> Result<Vec<Attachment>> {
        Err(Error::Unsupported("get_issue_attachments"))
    }

    fn issue_close(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        Err(Error::Unsupported("issue_close"))
    }

    fn issue_reopen(&self, ctx: &Context, owner: &str, repo: &str, issue: u64) -> Result<()> {
        Err(Error::Unsupported("issue_reopen"))
    }

    fn issue_assign(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        assignee: &str,
    ) -> Result<()> {
        Err(Error::Unsupported("issue_assign"))
    }

    fn issue_add_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<()> {
        Err(Error::Unsupported("issue_add_labels"))
    }

    fn issue_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<()> {
        Err(Error::Unsupported("issue_remove_labels"))
    }

    /// Creates a new issue, returning the created entity.
    fn submit_issue(&self, ctx: &Context, opts: &SubmitIssueOptions) -> Result<Issue> {
        Err(Error::Unsupported("submit_issue"))
    }

    fn issue_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        title: &str,
    ) -> Result<()> {
        Err(Error::Unsupported("issue_set_title"))
    }

    fn issue_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        issue: u64,
        milestone: u64,
    ) -> Result<()> {
        Err(Error::Unsupported("issue_set_milestone"))
    }

    fn issue_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, issue: u64)
        -> Result<()> {
        Err(Error::Unsupported("issue_clear_milestone"))
    }

    // -- Attachments ---------------------------------------------------------

    /// Streams the content of an attachment into `out`.
    fn attachment_get_content(&self, ctx: &Context, id: u64, out: &mut dyn Write) -> Result<()> {
        Err(Error::Unsupported("attachment_get_content"))
    }

    // -- Milestones ----------------------------------------------------------

    fn get_milestones(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Milestone>> {
        Err(Error::Unsupported("get_milestones"))
    }

    fn get_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        milestone: u64,
    ) -> Result<Milestone> {
        Err(Error::Unsupported("get_milestone"))
    }

    fn create_milestone(&self, ctx: &Context, opts: &MilestoneCreateOptions) -> Result<()> {
        Err(Error::Unsupported("create_milestone"))
    }

    fn delete_milestone(&self, ctx: &Context, owner: &str, repo: &str, milestone: u64)
        -> Result<()> {
        Err(Error::Unsupported("delete_milestone"))
    }

    /// Sets the due date; `date` is already normalized to the wire form.
    fn milestone_set_duedate(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        milestone: u64,
        date: &str,
    ) -> Result<()> {
        Err(Error::Unsupported("milestone_set_duedate"))
    }

    fn get_milestone_issues(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        milestone: u64,
    ) -> Result<Vec<Issue>> {
        Err(Error::Unsupported("get_milestone_issues"))
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
        Err(Error::Unsupported("search_pulls"))
    }

    fn get_pull(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<Pull> {
        Err(Error::Unsupported("get_pull"))
    }

    /// Streams the diff of a pull into `out`.
    fn pull_get_diff(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        Err(Error::Unsupported("pull_get_diff"))
    }

    /// Streams the patch series of a pull into `out`.
    fn pull_get_patch(
        &self,
        ctx: &Context,
        out: &mut dyn Write,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<()> {
        Err(Error::Unsupported("pull_get_patch"))
    }

    /// Returns the CI results for a pull; the variant depends on the
    /// backend.
    fn get_pull_checks(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<PullChecks> {
        Err(Error::Unsupported("get_pull_checks"))
    }

    fn pull_merge(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        flags: MergeFlags,
    ) -> Result<()> {
        Err(Error::Unsupported("pull_merge"))
    }

    fn pull_reopen(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        Err(Error::Unsupported("pull_reopen"))
    }

    fn pull_close(&self, ctx: &Context, owner: &str, repo: &str, pull: u64) -> Result<()> {
        Err(Error::Unsupported("pull_close"))
    }

    fn submit_pull(&self, ctx: &Context, opts: &SubmitPullOptions) -> Result<()> {
        Err(Error::Unsupported("submit_pull"))
    }

    fn get_pull_commits(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
    ) -> Result<Vec<Commit>> {
        Err(Error::Unsupported("get_pull_commits"))
    }

    fn pull_add_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        Err(Error::Unsupported("pull_add_labels"))
    }

    fn pull_remove_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        labels: &[String],
    ) -> Result<()> {
        Err(Error::Unsupported("pull_remove_labels"))
    }

    fn pull_set_milestone(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        milestone: u64,
    ) -> Result<()> {
        Err(Error::Unsupported("pull_set_milestone"))
    }

    fn pull_clear_milestone(&self, ctx: &Context, owner: &str, repo: &str, pull: u64)
        -> Result<()> {
        Err(Error::Unsupported("pull_clear_milestone"))
    }

    fn pull_add_reviewer(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        username: &str,
    ) -> Result<()> {
        Err(Error::Unsupported("pull_add_reviewer"))
    }

    fn pull_set_title(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        pull: u64,
        title: &str,
    ) -> Result<()> {
        Err(Error::Unsupported("pull_set_title"))
    }

    // -- Releases ------------------------------------------------------------

    fn get_releases(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Release>> {
        Err(Error::Unsupported("get_releases"))
    }

    fn create_release(&self, ctx: &Context, release: &NewRelease) -> Result<()> {
        Err(Error::Unsupported("create_release"))
    }

    fn delete_release(&self, ctx: &Context, owner: &str, repo: &str, id: &str) -> Result<()> {
        Err(Error::Unsupported("delete_release"))
    }

    // -- Labels --------------------------------------------------------------

    fn get_labels(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        max: Option<usize>,
    ) -> Result<Vec<Label>> {
        Err(Error::Unsupported("get_labels"))
    }

    /// Creates a label; the id is filled in from the response.
    fn create_label(&self, ctx: &Context, owner: &str, repo: &str, label: &mut Label)
        -> Result<()> {
        Err(Error::Unsupported("create_label"))
    }

    fn delete_label(&self, ctx: &Context, owner: &str, repo: &str, name: &str) -> Result<()> {
        Err(Error::Unsupported("delete_label"))
    }

    // -- Repos ---------------------------------------------------------------

    fn get_repos(
        &self,
        ctx: &Context,
        owner: &str,
        max: Option<usize>,
    ) -> Result<Vec<Repo>> {
        Err(Error::Unsupported("get_repos"))
    }

    /// Lists repos of the authenticated account.
    fn get_own_repos(&self, ctx: &Context, max: Option<usize>) -> Result<Vec<Repo>> {
        Err(Error::Unsupported("get_own_repos"))
    }

    fn repo_create(&self, ctx: &Context, opts: &RepoCreateOptions) -> Result<Repo> {
        Err(Error::Unsupported("repo_create"))
    }

    fn repo_delete(&self, ctx: &Context, owner: &str, repo: &str) -> Result<()> {
        Err(Error::Unsupported("repo_delete"))
    }

    fn repo_set_visibility(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        visibility: Visibility,
    ) -> Result<()> {
        Err(Error::Unsupported("repo_set_visibility"))
    }

    // -- SSH keys ------------------------------------------------------------

    fn get_sshkeys(&self, ctx: &Context) -> Result<Vec<SshKey>> {
        Err(Error::Unsupported("get_sshkeys"))
    }

    /// Registers the public key read from `public_key_path`.
    fn add_sshkey(&self, ctx: &Context, title: &str, public_key_path: &Path) -> Result<SshKey> {
        Err(Error::Unsupported("add_sshkey"))
    }

    fn delete_sshkey(&self, ctx: &Context, id: u64) -> Result<()> {
        Err(Error::Unsupported("delete_sshkey"))
    }

    // -- Notifications -------------------------------------------------------

    fn get_notifications(&self, ctx: &Context, max: Option<usize>) -> Result<Vec<Notification>> {
        Err(Error::Unsupported("get_notifications"))
    }

    fn notification_mark_as_read(&self, ctx: &Context, id: &str) -> Result<()> {
        Err(Error::Unsupported("notification_mark_as_read"))
    }

    // -- Internal ------------------------------------------------------------

    /// Builds the `Authorization` header value for this forge, or `None`
    /// for backends that authenticate through the URL.
    fn make_auth_header(&self, token: &str) -> Option<String>;

    /// The extractor that pulls a diagnostic out of API error bodies.
    fn api_error_fn(&self) -> ApiErrorFn;

    /// JSON key naming the user identifier in this forge's user objects.
    fn user_object_key(&self) -> &'static str;

    // -- Quirks --------------------------------------------------------------

    fn issue_quirks(&self) -> IssueQuirks {
        IssueQuirks::default()
    }

    fn pull_quirks(&self) -> PullQuirks {
        PullQuirks::default()
    }

    fn milestone_quirks(&self) -> MilestoneQuirks {
        MilestoneQuirks::default()
    }
}

/// Returns the backend for the given forge kind.
pub fn forge(kind: ForgeKind) -> &'static dyn Forge {
    match kind {
        ForgeKind::Github => &crate::github::Github,
        ForgeKind::Gitlab => &crate::gitlab::Gitlab,
        ForgeKind::Gitea => &crate::gitea::Gitea,
        ForgeKind::Bugzilla => &crate::bugzilla::Bugzilla,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;

    fn ctx() -> Context {
        ContextBuilder::new()
            .config(forge_config::Config::default())
            .cwd(std::env::temp_dir())
            .build()
            .unwrap()
    }

    #[test]
    fn absent_operation_reports_dispatch_error() {
        let ctx = ctx();
        let release = NewRelease::default();
        let err = forge(ForgeKind::Bugzilla)
            .create_release(&ctx, &release)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "create_release is not available on this forge"
        );
    }

    #[test]
    fn absent_operations_never_touch_state() {
        // Every backend answers the internal queries, and unsupported
        // operations fail with the canonical message instead of panicking.
        let ctx = ctx();
        for kind in [
            ForgeKind::Github,
            ForgeKind::Gitlab,
            ForgeKind::Gitea,
            ForgeKind::Bugzilla,
        ] {
            let backend = forge(kind);
            let _ = backend.user_object_key();
            let _ = backend.api_error_fn();
            let _ = backend.issue_quirks();

            // Attachments exist on Bugzilla only; checks never on Gitea.
            if kind != ForgeKind::Bugzilla {
                let err = backend
                    .get_issue_attachments(&ctx, "o", "r", 1)
                    .unwrap_err();
                assert_eq!(
                    err.to_string(),
                    "get_issue_attachments is not available on this forge"
                );
            }
        }
        let err = forge(ForgeKind::Gitea)
            .get_pull_checks(&ctx, "o", "r", 1)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_pull_checks is not available on this forge"
        );
    }
}
