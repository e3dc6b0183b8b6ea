//! GitLab issues.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Comment, CommentTarget, Issue, IssueFilter, SubmitCommentOptions,
    SubmitIssueOptions};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

use super::{project_path, user_id};

pub(crate) fn parse_issue(s: &mut Stream<'_>, user_key: &str) -> DResult<Issue> {
    let mut issue = Issue::default();
    s.object(|s, key| {
        match key {
            "iid" => issue.number = s.uint()?,
            "title" => issue.title = s.string()?,
            "created_at" => issue.created_at = s.string()?,
            "author" => issue.author = s.user(user_key)?,
            "state" => issue.state = s.string()?,
            "user_notes_count" => issue.comments_count = s.int()? as i32,
            "discussion_locked" => issue.locked = s.boolean()?,
            "description" => issue.body = parse::text(s)?,
            "labels" => issue.labels = s.string_array()?,
            "assignees" => issue.assignees = parse::user_array(s, user_key)?,
            "milestone" => issue.milestone = parse::milestone_title(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(issue)
}

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
        None,
    )
}

pub(crate) fn search(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    filter: &IssueFilter,
    max: Option<usize>,
) -> Result<Vec<Issue>> {
    let mut params: Vec<String> = Vec::new();
    if !filter.all {
        params.push("state=opened".to_string());
    }
    if let Some(author) = &filter.author {
        params.push(format!("author_username={}", urlencode(author)));
    }
    if let Some(label) = &filter.label {
        params.push(format!("labels={}", urlencode(label)));
    }
    if let Some(milestone) = &filter.milestone {
        params.push(format!("milestone={}", urlencode(milestone)));
    }

    let mut url = format!(
        "{}/projects/{}/issues",
        session.base(),
        project_path(owner, repo),
    );
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
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

/// Close/reopen via GitLab's `state_event` update field.
pub(crate) fn state_event(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    event: &str,
) -> Result<()> {
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("state_event")?;
    r#gen.string(event)?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn assign(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    assignee: &str,
) -> Result<()> {
    let id = user_id(session, assignee)?;
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("assignee_ids")?;
    r#gen.begin_array()?;
    r#gen.id(id)?;
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

/// Adds or removes labels through the update endpoint; `field` is
/// `add_labels` or `remove_labels`, which take a comma-joined list.
pub(crate) fn change_labels(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
    field: &str,
    labels: &[String],
) -> Result<()> {
    let url = issue_url(session, owner, repo, issue);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember(field)?;
    r#gen.string(&labels.join(","))?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn submit(session: &Session<'_>, opts: &SubmitIssueOptions) -> Result<Issue> {
    let url = format!(
        "{}/projects/{}/issues",
        session.base(),
        project_path(&opts.owner, &opts.repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(&opts.title)?;
    r#gen.objmember("description")?;
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

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

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
    r#gen.objmember("milestone_id")?;
    match milestone {
        Some(id) => r#gen.id(id)?,
        None => r#gen.null()?,
    }
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

// -- Comments (notes) --------------------------------------------------------

pub(crate) fn parse_note(s: &mut Stream<'_>, user_key: &str) -> DResult<Comment> {
    let mut comment = Comment::default();
    s.object(|s, key| {
        match key {
            "id" => comment.id = s.uint()?,
            "author" => comment.author = s.user(user_key)?,
            "created_at" => comment.date = s.string()?,
            "body" => comment.body = parse::text(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(comment)
}

pub(crate) fn fetch_notes(session: &Session<'_>, url: String) -> Result<Vec<Comment>> {
    let user_key = session.user_key();
    session.list(
        url,
        None,
        |s, items| {
            s.array(|s| {
                items.push(parse_note(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn get_comments(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
) -> Result<Vec<Comment>> {
    let url = format!("{}/notes", issue_url(session, owner, repo, issue));
    fetch_notes(session, url)
}

pub(crate) fn submit_comment(session: &Session<'_>, opts: &SubmitCommentOptions) -> Result<()> {
    let kind = match opts.target {
        CommentTarget::Issue(_) => "issues",
        CommentTarget::Pull(_) => "merge_requests",
    };
    let url = format!(
        "{}/projects/{}/{}/{}/notes",
        session.base(),
        project_path(&opts.owner, &opts.repo),
        kind,
        opts.target.number(),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("body")?;
    r#gen.string(&opts.message)?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

fn issue_url(session: &Session<'_>, owner: &str, repo: &str, issue: u64) -> String {
    format!(
        "{}/projects/{}/issues/{}",
        session.base(),
        project_path(owner, repo),
        issue,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_gitlab_issue() {
        let json = r#"
        {
          "iid": 193,
          "title": "Make notifications work on GitLab",
          "created_at": "2022-03-17T20:27:21.805Z",
          "author": { "id": 10, "username": "herrhotzenplotz" },
          "state": "opened",
          "user_notes_count": 2,
          "discussion_locked": null,
          "description": "See title",
          "labels": ["todo", "gitlab"],
          "assignees": [{ "username": "herrhotzenplotz" }],
          "milestone": { "id": 2975318, "title": "Gitlab support" }
        }"#;
        let mut s = Stream::new(json);
        let issue = parse_issue(&mut s, "username").unwrap();
        assert_eq!(issue.number, 193);
        assert_eq!(issue.author, "herrhotzenplotz");
        assert_eq!(issue.comments_count, 2);
        assert!(!issue.locked);
        assert_eq!(issue.labels, vec!["todo", "gitlab"]);
        assert_eq!(issue.milestone.as_deref(), Some("Gitlab support"));
        assert!(!issue.is_pr);
    }
}
