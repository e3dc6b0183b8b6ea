//! Gitea repository specifics.

use forge_http::urlencode;
use forge_json::JsonGen;

use crate::error::Result;
use crate::session::Session;

/// Visibility on Gitea is a boolean `private` flag on the repo edit
/// endpoint.
pub(crate) fn set_private(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    private: bool,
) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("private")?;
    r#gen.boolean(private)?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}
