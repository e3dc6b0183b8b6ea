//! Gitea pull request specifics.

use std::io::Write;

use forge_http::urlencode;
use forge_json::JsonGen;
use forge_types::{MergeFlags, SubmitPullOptions};

use crate::error::Result;
use crate::session::Session;

/// Gitea serves `/pulls/{n}.diff` and `/pulls/{n}.patch` directly.
pub(crate) fn download(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    kind: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/pulls/{}.{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        pull,
        kind,
    );
    session.download(&url, None, out)
}

pub(crate) fn merge(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    flags: MergeFlags,
) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/pulls/{}/merge",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        pull,
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("Do")?;
    r#gen.string(if flags.squash { "squash" } else { "merge" })?;
    r#gen.objmember("delete_branch_after_merge")?;
    r#gen.boolean(flags.delete_source)?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn submit(session: &Session<'_>, opts: &SubmitPullOptions) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/pulls",
        session.base(),
        urlencode(&opts.owner),
        urlencode(&opts.repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(&opts.title)?;
    r#gen.objmember("body")?;
    r#gen.string(&opts.body)?;
    r#gen.objmember("head")?;
    r#gen.string(&opts.from)?;
    r#gen.objmember("base")?;
    r#gen.string(&opts.to)?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}
