//! GitLab projects (repos) and forks.

use forge_http::urlencode;
use forge_json::{EventKind, JsonGen, Stream};
use forge_types::{Fork, Repo, RepoCreateOptions, Visibility};

use crate::error::Result;
use crate::parse::DResult;
use crate::session::Session;

use super::project_path;

pub(crate) fn parse_project(s: &mut Stream<'_>) -> DResult<Repo> {
    let mut repo = Repo::default();
    s.object(|s, key| {
        match key {
            "id" => repo.id = s.uint()?,
            "path_with_namespace" => repo.full_name = s.string()?,
            "path" => repo.name = s.string()?,
            "namespace" => {
                s.object(|s, key| {
                    if key == "full_path" {
                        repo.owner = s.string()?;
                    } else {
                        s.skip_value()?;
                    }
                    Ok(())
                })?;
            }
            "created_at" => repo.date = s.string()?,
            "visibility" => repo.visibility = s.string()?,
            "forked_from_project" => {
                repo.is_fork = s.peek_kind()? != EventKind::Null;
                s.skip_value()?;
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(repo)
}

fn fetch_projects(session: &Session<'_>, url: String, max: Option<usize>) -> Result<Vec<Repo>> {
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_project(s)?);
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
    let url = format!("{}/users/{}/projects", session.base(), urlencode(owner));
    fetch_projects(session, url, max)
}

pub(crate) fn get_own_repos(session: &Session<'_>, max: Option<usize>) -> Result<Vec<Repo>> {
    let url = format!("{}/projects?owned=true", session.base());
    fetch_projects(session, url, max)
}

/// Numeric project id, needed where the API insists on ids.
pub(crate) fn project_id(session: &Session<'_>, owner: &str, repo: &str) -> Result<u64> {
    let url = format!("{}/projects/{}", session.base(), project_path(owner, repo));
    let project = session.get_parsed(&url, |s| Ok(parse_project(s)?))?;
    Ok(project.id)
}

pub(crate) fn create(session: &Session<'_>, opts: &RepoCreateOptions) -> Result<Repo> {
    let url = format!("{}/projects", session.base());
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("name")?;
    r#gen.string(&opts.name)?;
    r#gen.objmember("description")?;
    r#gen.string(&opts.description)?;
    r#gen.objmember("visibility")?;
    r#gen.string(if opts.private { "private" } else { "public" })?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;
    let mut stream = Stream::new(&response.body);
    Ok(parse_project(&mut stream)?)
}

pub(crate) fn delete(session: &Session<'_>, owner: &str, repo: &str) -> Result<()> {
    let url = format!("{}/projects/{}", session.base(), project_path(owner, repo));
    session.send("DELETE", &url, None)?;
    Ok(())
}

pub(crate) fn set_visibility(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    visibility: Visibility,
) -> Result<()> {
    let url = format!("{}/projects/{}", session.base(), project_path(owner, repo));
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("visibility")?;
    r#gen.string(visibility.as_str())?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

// -- Forks -------------------------------------------------------------------

fn parse_fork(s: &mut Stream<'_>) -> DResult<Fork> {
    let mut fork = Fork::default();
    s.object(|s, key| {
        match key {
            "path_with_namespace" => fork.full_name = s.string()?,
            "namespace" => {
                s.object(|s, key| {
                    if key == "full_path" {
                        fork.owner = s.string()?;
                    } else {
                        s.skip_value()?;
                    }
                    Ok(())
                })?;
            }
            "created_at" => fork.date = s.string()?,
            "forks_count" => fork.forks_count = s.int()? as i32,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(fork)
}

pub(crate) fn get_forks(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    max: Option<usize>,
) -> Result<Vec<Fork>> {
    let url = format!(
        "{}/projects/{}/forks",
        session.base(),
        project_path(owner, repo),
    );
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_fork(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn fork_create(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    into: Option<&str>,
) -> Result<()> {
    let url = format!(
        "{}/projects/{}/fork",
        session.base(),
        project_path(owner, repo),
    );
    let payload = match into {
        Some(namespace) => {
            let mut r#gen = JsonGen::new();
            r#gen.begin_object()?;
            r#gen.objmember("namespace_path")?;
            r#gen.string(namespace)?;
            r#gen.end_object()?;
            Some(r#gen.into_string())
        }
        None => None,
    };

    session.send("POST", &url, payload.as_deref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_project_fields() {
        let json = r#"
        {
          "id": 34707535,
          "path_with_namespace": "herrhotzenplotz/gearbox",
          "path": "gearbox",
          "namespace": { "full_path": "herrhotzenplotz" },
          "created_at": "2022-03-01T00:00:00.000Z",
          "visibility": "public",
          "forked_from_project": null
        }"#;
        let mut s = Stream::new(json);
        let repo = parse_project(&mut s).unwrap();
        assert_eq!(repo.id, 34707535);
        assert_eq!(repo.full_name, "herrhotzenplotz/gearbox");
        assert_eq!(repo.owner, "herrhotzenplotz");
        assert!(!repo.is_fork);
    }

    #[test]
    fn forked_project_is_marked() {
        let json = r#"{"id": 1, "forked_from_project": {"id": 2}}"#;
        let mut s = Stream::new(json);
        let repo = parse_project(&mut s).unwrap();
        assert!(repo.is_fork);
    }
}
