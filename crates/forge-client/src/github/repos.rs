//! GitHub repositories.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Repo, RepoCreateOptions, Visibility};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

pub(crate) fn parse_repo(s: &mut Stream<'_>, user_key: &str) -> DResult<Repo> {
    let mut repo = Repo::default();
    let mut private = None;
    s.object(|s, key| {
        match key {
            "id" => repo.id = s.uint()?,
            "full_name" => repo.full_name = s.string()?,
            "name" => repo.name = s.string()?,
            "owner" => repo.owner = s.user(user_key)?,
            "created_at" => repo.date = s.string()?,
            "visibility" => repo.visibility = s.string()?,
            "private" => private = Some(s.boolean()?),
            "fork" => repo.is_fork = s.boolean()?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    // Older deployments ship only the `private` flag.
    if repo.visibility.is_empty() {
        if let Some(private) = private {
            repo.visibility = if private { "private" } else { "public" }.to_string();
        }
    }
    Ok(repo)
}

fn fetch_repos(session: &Session<'_>, url: String, max: Option<usize>) -> Result<Vec<Repo>> {
    let user_key = session.user_key();
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_repo(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn get_repos(
    session: &Session<'_>,
    owner: &str,
    max: Option<usize>,
) -> Result<Vec<Repo>> {
    // The API distinguishes users from organisations; probe which one
    // the owner is and pick the matching repo listing.
    let probe_url = format!("{}/users/{}", session.base(), urlencode(owner));
    let url = if session.probe(&probe_url) {
        format!("{}/users/{}/repos", session.base(), urlencode(owner))
    } else {
        format!("{}/orgs/{}/repos", session.base(), urlencode(owner))
    };
    fetch_repos(session, url, max)
}

pub(crate) fn get_own_repos(session: &Session<'_>, max: Option<usize>) -> Result<Vec<Repo>> {
    let url = format!("{}/user/repos", session.base());
    fetch_repos(session, url, max)
}

pub(crate) fn create(session: &Session<'_>, opts: &RepoCreateOptions) -> Result<Repo> {
    let url = format!("{}/user/repos", session.base());
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("name")?;
    r#gen.string(&opts.name)?;
    r#gen.objmember("description")?;
    r#gen.string(&opts.description)?;
    r#gen.objmember("private")?;
    r#gen.boolean(opts.private)?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;
    let mut stream = Stream::new(&response.body);
    Ok(parse_repo(&mut stream, session.user_key())?)
}

pub(crate) fn delete(session: &Session<'_>, owner: &str, repo: &str) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    session.send("DELETE", &url, None)?;
    Ok(())
}

pub(crate) fn set_visibility(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    visibility: Visibility,
) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("visibility")?;
    r#gen.string(visibility.as_str())?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_repo_fields() {
        let json = r#"
        {
          "id": 352279551,
          "full_name": "herrhotzenplotz/gearbox",
          "name": "gearbox",
          "owner": { "login": "herrhotzenplotz" },
          "created_at": "2021-03-28T08:10:42Z",
          "visibility": "public",
          "fork": false
        }"#;
        let mut s = Stream::new(json);
        let repo = parse_repo(&mut s, "login").unwrap();
        assert_eq!(repo.id, 352279551);
        assert_eq!(repo.full_name, "herrhotzenplotz/gearbox");
        assert_eq!(repo.owner, "herrhotzenplotz");
        assert_eq!(repo.visibility, "public");
        assert!(!repo.is_fork);
    }

    #[test]
    fn private_flag_fallback() {
        let mut s = Stream::new(r#"{"name": "x", "private": true}"#);
        let repo = parse_repo(&mut s, "login").unwrap();
        assert_eq!(repo.visibility, "private");
    }
}
