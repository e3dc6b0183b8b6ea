//! GitHub issues.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Issue, IssueFilter, SubmitIssueOptions};

use crate::error::{Error, Result};
use crate::parse::{self, DResult};
use crate::session::Session;

use super::milestones;

/// Parses one issue object.
pub(crate) fn parse_issue(s: &mut Stream<'_>, user_key: &str) -> DResult<Issue> {
    let mut issue = Issue::default();
    s.object(|s, key| {
        match key {
            "number" => issue.number = s.uint()?,
            "title" => issue.title = s.string()?,
            "created_at" => issue.created_at = s.string()?,
            "user" => issue.author = s.user(user_key)?,
            "state" => issue.state = s.string()?,
            "comments" => issue.comments_count = s.int()? as i32,
            "locked" => issue.locked = s.boolean()?,
            "body" => issue.body = parse::text(s)?,
            "labels" => issue.labels = parse::label_objects(s)?,
            "assignees" => issue.assignees = parse::user_array(s, user_key)?,
            "pull_request" => {
                issue.is_pr = true;
                s.skip_value()?;
            }
            "milestone" => issue.milestone = parse::milestone_title(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(issue)
}

/// The issues endpoint reports pull requests too; they are dropped from
/// the accumulated list in place.
pub(crate) fn drop_pull_requests(items: &mut Vec<Issue>) {
    items.retain(|issue| !issue.is_pr);
}

/// Paginates `url`, parsing issue pages and filtering out pulls.
pub(crate) fn fetch_issues(
    session: &Session<'_>,
    url: String,
    max: Option<usize>,
) -> Result<Vec<Issue>> {
    let user_key = session.user_key();
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_issue(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        Some(&drop_pull_requests),
    )
}

pub(crate) fn search(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    filter: &IssueFilter,
    max: Option<usize>,
) -> Result<Vec<Issue>> {
    let mut url = format!(
        "{}/repos/{}/{}/issues?state={}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        if filter.all { "all" } else { "open" },
    );
    if let Some(author) = &filter.author {
        url.push_str(&format!("&creator={}", urlencode(author)));
    }
    if let Some(label) = &filter.label {
        url.push_str(&format!("&labels={}", urlencode(label)));
    }
    if let Some(milestone) = &filter.milestone {
        let id = milestones::resolve_id(session, owner, repo, milestone)?;
        url.push_str(&format!("&milestone={id}"));
    }

    fetch_issues(session, url, max)
}

pub(crate) fn get_summary(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
) -> Result<Issue> {
    let url = issue_url(session, owner, repo, issue);
    let user_key = session.user_key();
    session.get_parsed(&url, |s| Ok(parse_issue(s, user_key)?))
}

pub(crate) fn patch_state(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    state: &str,
) -> Result<()> {
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("state")?;
    r#gen.string(state)?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn assign(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    assignee: &str,
) -> Result<()> {
    let url = format!("{}/assignees", issue_url(session, owner, repo, issue));
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("assignees")?;
    r#gen.begin_array()?;
    r#gen.string(assignee)?;
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn add_labels(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    labels: &[String],
) -> Result<()> {
    let url = format!("{}/labels", issue_url(session, owner, repo, issue));
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("labels")?;
    r#gen.begin_array()?;
    for label in labels {
        r#gen.string(label)?;
    }
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn remove_labels(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    labels: &[String],
) -> Result<()> {
    if labels.len() != 1 {
        return Err(Error::input(
            "GitHub only supports removing labels one by one",
        ));
    }
    let url = format!(
        "{}/labels/{}",
        issue_url(session, owner, repo, issue),
        urlencode(&labels[0]),
    );
    session.send("DELETE", &url, None)?;
    Ok(())
}

pub(crate) fn submit(session: &Session<'_>, opts: &SubmitIssueOptions) -> Result<Issue> {
    let url = format!(
        "{}/repos/{}/{}/issues",
        session.base(),
        urlencode(&opts.owner),
        urlencode(&opts.repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(&opts.title)?;
    r#gen.objmember("body")?;
    r#gen.string(&opts.body)?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;
    let mut stream = Stream::new(&response.body);
    Ok(parse_issue(&mut stream, session.user_key())?)
}

pub(crate) fn set_title(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    title: &str,
) -> Result<()> {
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(title)?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

/// Sets or clears (`None`) the milestone of an issue or pull.
pub(crate) fn set_milestone(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    milestone: Option<u64>,
) -> Result<()> {
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("milestone")?;
    match milestone {
        Some(id) => r#gen.id(id)?,
        None => r#gen.null()?,
    }
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn issue_url(session: &Session<'_>, owner: &str, repo: &str, issue: u64) -> String {
    format!(
        "{}/repos/{}/{}/issues/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        issue,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIMPLE_ISSUE: &str = r#"
    {
      "number": 115,
      "title": "consider removing FILE *out from printing functions",
      "created_at": "2022-03-22T16:06:10Z",
      "user": { "login": "herrhotzenplotz", "id": 30080223 },
      "state": "closed",
      "comments": 0,
      "locked": false,
      "body": "The printing functions should just print to stdout.",
      "labels": [],
      "assignees": [],
      "milestone": null
    }"#;

    #[test]
    fn parse_simple_issue() {
        let mut s = Stream::new(SIMPLE_ISSUE);
        let issue = parse_issue(&mut s, "login").unwrap();

        assert_eq!(issue.number, 115);
        assert_eq!(
            issue.title,
            "consider removing FILE *out from printing functions"
        );
        assert_eq!(issue.state, "closed");
        assert_eq!(issue.author, "herrhotzenplotz");
        assert_eq!(issue.comments_count, 0);
        assert!(!issue.locked);
        assert!(!issue.is_pr);
        assert!(issue.labels.is_empty());
        assert!(issue.assignees.is_empty());
        assert_eq!(issue.milestone, None);
    }

    #[test]
    fn issue_with_labels_and_pull_marker() {
        let json = r#"
        {
          "number": 7,
          "title": "t",
          "labels": [{"id": 1, "name": "bug"}, {"id": 2, "name": "ci"}],
          "assignees": [{"login": "alice"}, {"login": "bob"}],
          "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/7"},
          "milestone": {"number": 1, "title": "release"}
        }"#;
        let mut s = Stream::new(json);
        let issue = parse_issue(&mut s, "login").unwrap();
        assert_eq!(issue.labels, vec!["bug", "ci"]);
        assert_eq!(issue.assignees, vec!["alice", "bob"]);
        assert!(issue.is_pr);
        assert_eq!(issue.milestone.as_deref(), Some("release"));
    }

    #[test]
    fn pulls_are_dropped_from_issue_lists() {
        let mut items = vec![
            Issue {
                number: 1,
                is_pr: false,
                ..Issue::default()
            },
            Issue {
                number: 2,
                is_pr: true,
                ..Issue::default()
            },
            Issue {
                number: 3,
                is_pr: false,
                ..Issue::default()
            },
        ];
        drop_pull_requests(&mut items);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|issue| !issue.is_pr));
    }

    #[test]
    fn null_body_becomes_empty() {
        let mut s = Stream::new(r#"{"number": 1, "title": "x", "body": null}"#);
        let issue = parse_issue(&mut s, "login").unwrap();
        assert_eq!(issue.body, "");
    }
}
