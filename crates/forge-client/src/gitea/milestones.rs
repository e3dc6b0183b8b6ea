//! Gitea milestones.
//!
//! The JSON differs from GitHub's just enough to need its own parser:
//! the id field is `id` (not `number`) and the due date is `due_on`.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Issue, Milestone, MilestoneCreateOptions};

use crate::error::Result;
use crate::github;
use crate::parse::{self, DResult};
use crate::session::Session;

pub(crate) fn parse_milestone(s: &mut Stream<'_>) -> DResult<Milestone> {
    let mut milestone = Milestone::default();
    s.object(|s, key| {
        match key {
            "id" => milestone.id = s.uint()?,
            "title" => milestone.title = s.string()?,
            "state" => milestone.state = s.string()?,
            "created_at" => milestone.created_at = parse::text(s)?,
            "updated_at" => milestone.updated_at = parse::text(s)?,
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
        "{}/repos/{}/{}/milestones",
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
    // Gitea filters by a plural `milestones` parameter.
    let url = format!(
        "{}/repos/{}/{}/issues?state=all&milestones={}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        milestone,
    );
    github::issues::fetch_issues(session, url, None)
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
    fn parse_gitea_milestone() {
        let json = r#"
        {
          "id": 4,
          "title": "1.0",
          "state": "open",
          "description": "",
          "due_on": "2023-01-01T00:00:00Z",
          "open_issues": 3,
          "closed_issues": 11
        }"#;
        let mut s = Stream::new(json);
        let milestone = parse_milestone(&mut s).unwrap();
        assert_eq!(milestone.id, 4);
        assert_eq!(milestone.due_date.as_deref(), Some("2023-01-01T00:00:00Z"));
        assert_eq!(milestone.open_issues, 3);
        assert_eq!(milestone.closed_issues, 11);
    }
}
