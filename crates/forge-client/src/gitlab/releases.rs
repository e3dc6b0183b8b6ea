//! GitLab releases.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{NewRelease, Release, ReleaseAsset};

use crate::error::{Error, Result};
use crate::parse::{self, DResult};
use crate::session::Session;

use super::project_path;

pub(crate) fn parse_release(s: &mut Stream<'_>, user_key: &str) -> DResult<Release> {
    let mut release = Release::default();
    s.object(|s, key| {
        match key {
            "tag_name" => release.id = s.string()?,
            "name" => release.name = parse::text(s)?,
            "description" => release.body = parse::text(s)?,
            "author" => release.author = s.user(user_key)?,
            "created_at" => release.date = s.string()?,
            "upcoming_release" => release.prerelease = s.boolean()?,
            "assets" => parse_assets(s, &mut release)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(release)
}

/// The `assets` object carries generated `sources` (archives) and
/// user-provided `links`. The tar.gz source doubles as the tarball URL.
fn parse_assets(s: &mut Stream<'_>, release: &mut Release) -> DResult<()> {
    s.object(|s, key| {
        match key {
            "sources" => {
                s.array(|s| {
                    let mut format = String::new();
                    let mut url = String::new();
                    s.object(|s, key| {
                        match key {
                            "format" => format = s.string()?,
                            "url" => url = s.string()?,
                            _ => s.skip_value()?,
                        }
                        Ok(())
                    })?;
                    if format == "tar.gz" {
                        release.tarball_url = Some(url);
                    }
                    Ok(())
                })?;
            }
            "links" => {
                s.array(|s| {
                    let mut asset = ReleaseAsset::default();
                    s.object(|s, key| {
                        match key {
                            "name" => asset.name = s.string()?,
                            "url" => asset.url = s.string()?,
                            _ => s.skip_value()?,
                        }
                        Ok(())
                    })?;
                    release.assets.push(asset);
                    Ok(())
                })?;
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })
}

pub(crate) fn get_releases(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    max: Option<usize>,
) -> Result<Vec<Release>> {
    let url = format!(
        "{}/projects/{}/releases",
        session.base(),
        project_path(owner, repo),
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

pub(crate) fn create(session: &Session<'_>, release: &NewRelease) -> Result<()> {
    if !release.assets.is_empty() {
        return Err(Error::input(
            "GitLab does not support uploading release assets",
        ));
    }

    let url = format!(
        "{}/projects/{}/releases",
        session.base(),
        project_path(&release.owner, &release.repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("tag_name")?;
    r#gen.string(&release.tag)?;
    r#gen.objmember("name")?;
    r#gen.string(&release.name)?;
    r#gen.objmember("description")?;
    r#gen.string(&release.body)?;
    if let Some(commitish) = &release.commitish {
        r#gen.objmember("ref")?;
        r#gen.string(commitish)?;
    }
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

/// Releases are addressed by tag name on GitLab.
pub(crate) fn delete(session: &Session<'_>, owner: &str, repo: &str, id: &str) -> Result<()> {
    let url = format!(
        "{}/projects/{}/releases/{}",
        session.base(),
        project_path(owner, repo),
        urlencode(id),
    );
    session.send("DELETE", &url, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_release_assets() {
        let json = r#"
        {
          "tag_name": "1.0.0",
          "name": "1.0.0",
          "description": "first stable release",
          "author": { "username": "herrhotzenplotz" },
          "created_at": "2022-03-01T00:00:00.000Z",
          "upcoming_release": false,
          "assets": {
            "count": 3,
            "sources": [
              { "format": "zip", "url": "https://gitlab.com/o/r/-/archive/1.0.0/r-1.0.0.zip" },
              { "format": "tar.gz", "url": "https://gitlab.com/o/r/-/archive/1.0.0/r-1.0.0.tar.gz" }
            ],
            "links": [
              { "name": "binary", "url": "https://gitlab.com/o/r/-/releases/1.0.0/downloads/binary" }
            ]
          }
        }"#;
        let mut s = Stream::new(json);
        let release = parse_release(&mut s, "username").unwrap();
        assert_eq!(release.id, "1.0.0");
        assert_eq!(release.author, "herrhotzenplotz");
        assert!(release.tarball_url.as_deref().unwrap().ends_with(".tar.gz"));
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "binary");
    }
}
