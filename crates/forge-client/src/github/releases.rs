//! GitHub releases.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{NewRelease, Release, ReleaseAsset};

use crate::error::{Error, Result};
use crate::parse::{self, DResult};
use crate::session::Session;

pub(crate) fn parse_release(s: &mut Stream<'_>, user_key: &str) -> DResult<Release> {
    let mut release = Release::default();
    s.object(|s, key| {
        match key {
            "id" => release.id = s.int_to_string()?,
            "name" => release.name = parse::text(s)?,
            "body" => release.body = parse::text(s)?,
            "author" => release.author = s.user(user_key)?,
            "created_at" => release.date = s.string()?,
            "upload_url" => release.upload_url = s.nullable_string()?,
            "tarball_url" => release.tarball_url = s.nullable_string()?,
            "draft" => release.draft = s.boolean()?,
            "prerelease" => release.prerelease = s.boolean()?,
            "assets" => {
                s.array(|s| {
                    release.assets.push(parse_asset(s)?);
                    Ok(())
                })?;
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(release)
}

fn parse_asset(s: &mut Stream<'_>) -> DResult<ReleaseAsset> {
    let mut asset = ReleaseAsset::default();
    s.object(|s, key| {
        match key {
            "name" => asset.name = s.string()?,
            "browser_download_url" => asset.url = s.string()?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(asset)
}

pub(crate) fn get_releases(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    max: Option<usize>,
) -> Result<Vec<Release>> {
    let url = format!(
        "{}/repos/{}/{}/releases",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    let user_key = session.user_key();
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_release(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

/// Strips the `{?name,label}` template suffix off an upload URL.
pub(crate) fn strip_upload_url_template(upload_url: &str) -> &str {
    match upload_url.find('{') {
        Some(at) => &upload_url[..at],
        None => upload_url,
    }
}

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

    // The create response carries the asset upload URL as a template;
    // each asset goes up as a raw octet-stream POST against it.
    let mut stream = Stream::new(&response.body);
    let created = parse_release(&mut stream, session.user_key())?;
    let upload_url = created
        .upload_url
        .as_deref()
        .map(strip_upload_url_template)
        .ok_or_else(|| Error::input("release create response carries no upload url"))?;

    for asset in &release.assets {
        let data = std::fs::read(&asset.path).map_err(|e| Error::io(&asset.path, e))?;
        let url = format!("{}?name={}", upload_url, urlencode(&asset.name));
        session.upload(&url, "application/octet-stream", &data)?;
    }

    Ok(())
}

pub(crate) fn delete(session: &Session<'_>, owner: &str, repo: &str, id: &str) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/releases/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        id,
    );
    session.send("DELETE", &url, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_release_with_assets() {
        let json = r#"
        {
          "id": 61310139,
          "name": "0.9.8-beta",
          "body": "bugfix release",
          "author": { "login": "herrhotzenplotz" },
          "created_at": "2022-03-22T10:31:03Z",
          "upload_url": "https://uploads.github.com/repos/o/r/releases/61310139/assets{?name,label}",
          "tarball_url": "https://api.github.com/repos/o/r/tarball/0.9.8-beta",
          "draft": false,
          "prerelease": true,
          "assets": [
            { "name": "gearbox.tar.gz", "browser_download_url": "https://github.com/o/r/releases/download/0.9.8-beta/gearbox.tar.gz" }
          ]
        }"#;
        let mut s = Stream::new(json);
        let release = parse_release(&mut s, "login").unwrap();
        assert_eq!(release.id, "61310139");
        assert_eq!(release.name, "0.9.8-beta");
        assert_eq!(release.author, "herrhotzenplotz");
        assert!(release.prerelease);
        assert!(!release.draft);
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "gearbox.tar.gz");
    }

    #[test]
    fn upload_url_template_is_stripped() {
        assert_eq!(
            strip_upload_url_template(
                "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}"
            ),
            "https://uploads.github.com/repos/o/r/releases/1/assets"
        );
        // Non-template URLs pass through untouched.
        assert_eq!(strip_upload_url_template("https://x/assets"), "https://x/assets");
    }
}
