//! Gitea label specifics.
//!
//! Gitea addresses labels by numeric id everywhere the GitHub API takes
//! names, so each operation first resolves names against the repo's
//! label list.

use forge_http::urlencode;
use forge_json::JsonGen;

use crate::error::{Error, Result};
use crate::github;
use crate::session::Session;

/// Resolves a label name to its id.
fn label_id(session: &Session<'_>, owner: &str, repo: &str, name: &str) -> Result<u64> {
    let labels = github::labels::get_labels(session, owner, repo, None)?;
    labels
        .iter()
        .find(|label| label.name == name)
        .map(|label| label.id)
        .ok_or_else(|| Error::input(format!("{name}: no such label")))
}

pub(crate) fn add_to_issue(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    labels: &[String],
) -> Result<()> {
    let url = format!(
        "{}/labels",
        github::issues::issue_url(session, owner, repo, issue),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("labels")?;
    r#gen.begin_array()?;
    for name in labels {
        r#gen.id(label_id(session, owner, repo, name)?)?;
    }
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn remove_from_issue(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    labels: &[String],
) -> Result<()> {
    for name in labels {
        let id = label_id(session, owner, repo, name)?;
        let url = format!(
            "{}/labels/{}",
            github::issues::issue_url(session, owner, repo, issue),
            id,
        );
        session.send("DELETE", &url, None)?;
    }
    Ok(())
}

pub(crate) fn delete(session: &Session<'_>, owner: &str, repo: &str, name: &str) -> Result<()> {
    let id = label_id(session, owner, repo, name)?;
    let url = format!(
        "{}/repos/{}/{}/labels/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        id,
    );
    session.send("DELETE", &url, None)?;
    Ok(())
}
