//! Gitea releases.
//!
//! Creation reuses the GitHub payload; assets however are uploaded as
//! `multipart/form-data` against the release's assets endpoint rather
//! than a raw octet-stream POST.

use std::path::Path;

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::NewRelease;

use crate::error::Result;
use crate::github;
use crate::session::Session;

pub(crate) fn create(session: &Session<'_>, release: &NewRelease) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/releases",
        session.base(),
        urlencode(&release.owner),
        urlencode(&release.repo),
    );

    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("tag_name")?;
    r#gen.string(&release.tag)?;
    r#gen.objmember("name")?;
    r#gen.string(&release.name)?;
    r#gen.objmember("body")?;
    r#gen.string(&release.body)?;
    r#gen.objmember("draft")?;
    r#gen.boolean(release.draft)?;
    r#gen.objmember("prerelease")?;
    r#gen.boolean(release.prerelease)?;
    if let Some(commitish) = &release.commitish {
        r#gen.objmember("target_commitish")?;
        r#gen.string(commitish)?;
    }
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;

    if release.assets.is_empty() {
        return Ok(());
    }

    let mut stream = Stream::new(&response.body);
    let created = github::releases::parse_release(&mut stream, session.user_key())?;
    let assets_url = format!(
        "{}/repos/{}/{}/releases/{}/assets",
        session.base(),
        urlencode(&release.owner),
        urlencode(&release.repo),
        created.id,
    );

    for asset in &release.assets {
        let url = format!("{}?name={}", assets_url, urlencode(&asset.name));
        session.upload_multipart(&url, "attachment", Path::new(&asset.path))?;
    }

    Ok(())
}
