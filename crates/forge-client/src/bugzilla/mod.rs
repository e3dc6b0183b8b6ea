//! Bugzilla backend.
//!
//! Bugzilla is the odd one out: bugs live in a product/component
//! hierarchy rather than owner/repo (the uniform owner/repo pair maps
//! onto product/component), authentication travels as an `api_key`
//! query parameter instead of a header, and several responses are
//! dictionaries keyed by bug id that need unwrapping. Only the issue
//! and attachment surface exists; everything else reports the uniform
//! dispatch error.

pub(crate) mod attachments;
pub(crate) mod bugs;

use std::io::Write;

use forge_http::{urlencode, ApiErrorFn};
use forge_json::Stream;
use forge_types::{Attachment, Comment, Issue, IssueFilter, IssueQuirks, SubmitIssueOptions};

use crate::context::Context;
use crate::error::Result;
use crate::forge::Forge;
use crate::session::Session;

pub(crate) const USER_KEY: &str = "name";

/// Bugzilla errors come as `{"error": true, "message": "..."}`.
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
    // No Authorization header; the key rides on the URL.
    Session::new(ctx, api_error, USER_KEY, None)
}

/// Appends the configured API key to a URL when one is present.
pub(crate) fn with_api_key(ctx: &Context, url: String) -> String {
    match ctx.token() {
        Some(token) => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}api_key={}", urlencode(&token))
        }
        None => url,
    }
}

/// The Bugzilla backend singleton.
pub struct Bugzilla;

impl Forge for Bugzilla {
    fn search_issues(
        &self,
        ctx: &Context,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
        max: Option<usize>,
    ) -> Result<Vec<Issue>> {
        // owner/repo double as product/component here.
        bugs::search(ctx, owner, repo, filter, max)
    }

    fn get_issue_summary(&self, ctx: &Context, _owner: &str, _repo: &str, issue: u64)
        -> Result<Issue> {
        bugs::get_summary(ctx, issue)
    }

    fn get_issue_comments(
        &self,
        ctx: &Context,
        _owner: &str,
        _repo: &str,
        issue: u64,
    ) -> Result<Vec<Comment>> {
        bugs::get_comments(ctx, issue)
    }

    fn get_issue_attachments(
        &self,
        ctx: &Context,
        _owner: &str,
        _repo: &str,
        issue: u64,
    ) -> Result<Vec<Attachment>> {
        attachments::get_attachments(ctx, issue)
    }

    fn attachment_get_content(&self, ctx: &Context, id: u64, out: &mut dyn Write) -> Result<()> {
        attachments::get_content(ctx, id, out)
    }

    fn submit_issue(&self, ctx: &Context, opts: &SubmitIssueOptions) -> Result<Issue> {
        bugs::submit(ctx, opts)
    }

    // -- Internal ------------------------------------------------------------

    fn make_auth_header(&self, _token: &str) -> Option<String> {
        None
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
            comments_count: true,
            locked: true,
            ..IssueQuirks::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_extracts_message() {
        let body = r#"{"error": true, "code": 32000, "message": "API key is invalid"}"#;
        assert_eq!(api_error(body).as_deref(), Some("API key is invalid"));
    }
}
