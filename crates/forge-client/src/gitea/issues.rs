//! Gitea issue specifics.

use forge_json::JsonGen;

use crate::error::Result;
use crate::github::issues::issue_url;
use crate::session::Session;

/// Gitea has no assignees subresource; assignment goes through the
/// issue edit endpoint.
pub(crate) fn assign(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    assignee: &str,
) -> Result<()> {
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("assignees")?;
    r#gen.begin_array()?;
    r#gen.string(assignee)?;
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}
