//! GitLab milestones.

use forge_json::{JsonGen, Stream};
use forge_types::{Issue, Milestone, MilestoneCreateOptions};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

use super::{issues, project_path};

pub(crate) fn parse_milestone(s: &mut Stream<'_>) -> DResult<Milestone> {
    let mut milestone = Milestone::default();
    s.object(|s, key| {
        match key {
            "id" => milestone.id = s.uint()?,
            "title" => milestone.title = s.string()?,
            "state" => milestone.state = s.string()?,
            "created_at" => milestone.created_at = s.string()?,
            "updated_at" => milestone.updated_at = s.string()?,
            "description" => milestone.description = parse::text(s)?,
            "due_date" => milestone.due_date = s.nullable_string()?,
            "expired" => milestone.expired = s.boolean()?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(milestone)
}

pub(crate) fn get_milestones(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    max: Option<usize>,
) -> Result<Vec<Milestone>> {
    let url = format!(
        "{}/projects/{}/milestones",
        session.base(),
        project_path(owner, repo),
    );
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_milestone(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn get_milestone(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    milestone: u64,
) -> Result<Milestone> {
    let url = milestone_url(session, owner, repo, milestone);
    session.get_parsed(&url, |s| Ok(parse_milestone(s)?))
}

pub(crate) fn create(session: &Session<'_>, opts: &MilestoneCreateOptions) -> Result<()> {
    let url = format!(
        "{}/projects/{}/milestones",
        session.base(),
        project_path(&opts.owner, &opts.repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(&opts.title)?;
    r#gen.objmember("description")?;
    r#gen.string(&opts.description)?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn delete(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    milestone: u64,
) -> Result<()> {
    let url = milestone_url(session, owner, repo, milestone);
    session.send("DELETE", &url, None)?;
    Ok(())
}

/// GitLab due dates are plain `YYYY-MM-DD` strings.
pub(crate) fn set_duedate(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    milestone: u64,
    date: &str,
) -> Result<()> {
    let url = milestone_url(session, owner, repo, milestone);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("due_date")?;
    r#gen.string(date)?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn get_issues(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    milestone: u64,
) -> Result<Vec<Issue>> {
    let url = format!("{}/issues", milestone_url(session, owner, repo, milestone));
    issues::fetch_issues(session, url, None)
}

fn milestone_url(session: &Session<'_>, owner: &str, repo: &str, milestone: u64) -> String {
    format!(
        "{}/projects/{}/milestones/{}",
        session.base(),
        project_path(owner, repo),
        milestone,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_milestone_with_due_date() {
        let json = r#"
        {
          "id": 2975318,
          "title": "Gitlab support",
          "state": "active",
          "created_at": "2021-12-14T07:02:05.000Z",
          "updated_at": "2022-03-12T10:07:58.000Z",
          "description": "Support all of the GitLab API",
          "due_date": "2022-06-01",
          "expired": false
        }"#;
        let mut s = Stream::new(json);
        let milestone = parse_milestone(&mut s).unwrap();
        assert_eq!(milestone.id, 2975318);
        assert_eq!(milestone.state, "active");
        assert_eq!(milestone.due_date.as_deref(), Some("2022-06-01"));
        assert!(!milestone.expired);
        // GitLab does not report per-milestone issue counts.
        assert_eq!(milestone.open_issues, 0);
        assert_eq!(milestone.closed_issues, 0);
    }
}
