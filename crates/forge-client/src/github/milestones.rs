//! GitHub milestones.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Issue, Milestone, MilestoneCreateOptions};

use crate::error::{Error, Result};
use crate::parse::{self, DResult};
use crate::session::Session;

use super::issues;

pub(crate) fn parse_milestone(s: &mut Stream<'_>) -> DResult<Milestone> {
    let mut milestone = Milestone::default();
    s.object(|s, key| {
        match key {
            "number" => milestone.id = s.uint()?,
            "title" => milestone.title = s.string()?,
            "state" => milestone.state = s.string()?,
            "created_at" => milestone.created_at = s.string()?,
            "updated_at" => milestone.updated_at = s.string()?,
            "description" => milestone.description = parse::text(s)?,
            "due_on" => milestone.due_date = s.nullable_string()?,
            "open_issues" => milestone.open_issues = s.int()? as i32,
            "closed_issues" => milestone.closed_issues = s.int()? as i32,
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
        "{}/repos/{}/{}/milestones?state=all",
        session.base(),
        urlencode(owner),
        urlencode(repo),
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
        "{}/repos/{}/{}/milestones",
        session.base(),
        urlencode(&opts.owner),
        urlencode(&opts.repo),
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

pub(crate) fn set_duedate(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    milestone: u64,
    date: &str,
) -> Result<()> {
    // The API wants a full timestamp; plain dates get midnight UTC.
    let date = if date.contains('T') {
        date.to_string()
    } else {
        format!("{date}T00:00:00Z")
    };
    let url = milestone_url(session, owner, repo, milestone);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("due_on")?;
    r#gen.string(&date)?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn get_issues(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    milestone: u64,
) -> Result<Vec<Issue>> {
    let url = format!(
        "{}/repos/{}/{}/issues?milestone={}&state=all",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        milestone,
    );
    issues::fetch_issues(session, url, None)
}

/// Resolves a user-supplied milestone reference: a numeric id is taken
/// as-is, anything else is matched against the milestone titles.
pub(crate) fn resolve_id(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    reference: &str,
) -> Result<u64> {
    if let Ok(id) = reference.parse::<u64>() {
        return Ok(id);
    }
    let milestones = get_milestones(session, owner, repo, None)?;
    milestones
        .iter()
        .find(|m| m.title == reference)
        .map(|m| m.id)
        .ok_or_else(|| Error::input(format!("{reference}: no such milestone")))
}

fn milestone_url(session: &Session<'_>, owner: &str, repo: &str, milestone: u64) -> String {
    format!(
        "{}/repos/{}/{}/milestones/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        milestone,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_simple_milestone() {
        let json = r#"
        {
          "number": 1,
          "title": "Gitlab support",
          "state": "open",
          "created_at": "2021-12-14T07:02:05Z",
          "updated_at": "2022-03-12T10:07:58Z",
          "description": "",
          "due_on": null,
          "open_issues": 0,
          "closed_issues": 8
        }"#;
        let mut s = Stream::new(json);
        let milestone = parse_milestone(&mut s).unwrap();
        assert_eq!(milestone.id, 1);
        assert_eq!(milestone.title, "Gitlab support");
        assert_eq!(milestone.state, "open");
        assert_eq!(milestone.created_at, "2021-12-14T07:02:05Z");
        assert!(!milestone.expired);
        assert_eq!(milestone.open_issues, 0);
        assert_eq!(milestone.closed_issues, 8);
        assert_eq!(milestone.due_date, None);
    }
}
