//! GitLab merge requests.

use std::io::Write;

use forge_http::urlencode;
use forge_json::{EventKind, JsonGen, Stream};
use forge_types::{Comment, Commit, MergeFlags, Pull, PullChecks, PullFilter, SubmitPullOptions};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

use super::{issues, project_path, repos, user_id};

pub(crate) fn parse_mr(s: &mut Stream<'_>, user_key: &str) -> DResult<Pull> {
    let mut pull = Pull::default();
    s.object(|s, key| {
        match key {
            "iid" => pull.number = s.uint()?,
            "id" => pull.id = s.uint()?,
            "title" => pull.title = s.string()?,
            "description" => pull.body = parse::text(s)?,
            "state" => pull.state = s.string()?,
            "created_at" => pull.created_at = s.string()?,
            "author" => pull.author = s.user(user_key)?,
            "source_branch" => pull.head_label = s.string()?,
            "target_branch" => pull.base_label = s.string()?,
            "sha" => pull.head_sha = parse::text(s)?,
            "user_notes_count" => pull.comments_count = s.int()? as i32,
            "labels" => pull.labels = s.string_array()?,
            "milestone" => pull.milestone = parse::milestone_title(s)?,
            "draft" | "work_in_progress" => pull.draft = s.boolean()?,
            "merge_status" => {
                pull.mergeable = s.string()? == "can_be_merged";
            }
            "reviewers" => pull.reviewers = parse::user_array(s, user_key)?,
            "head_pipeline" => parse_head_pipeline(s, &mut pull)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    if pull.state == "merged" {
        pull.merged = true;
    }
    Ok(pull)
}

/// Pulls the pipeline id and coverage out of the `head_pipeline` object.
fn parse_head_pipeline(s: &mut Stream<'_>, pull: &mut Pull) -> DResult<()> {
    if s.peek_kind()? == EventKind::Null {
        s.next_event()?;
        return Ok(());
    }
    s.object(|s, key| {
        match key {
            "id" => pull.head_pipeline_id = s.int()?,
            "coverage" => {
                pull.coverage = match s.peek_kind()? {
                    EventKind::Str => Some(s.string()?),
                    EventKind::Num => Some(s.double()?.to_string()),
                    _ => {
                        s.skip_value()?;
                        None
                    }
                };
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })
}

pub(crate) fn search(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    filter: &PullFilter,
    max: Option<usize>,
) -> Result<Vec<Pull>> {
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
        "{}/projects/{}/merge_requests",
        session.base(),
        project_path(owner, repo),
    );
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }

    let user_key = session.user_key();
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_mr(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn get(session: &Session<'_>, owner: &str, repo: &str, pull: u64) -> Result<Pull> {
    let url = mr_url(session, owner, repo, pull);
    let user_key = session.user_key();
    session.get_parsed(&url, |s| Ok(parse_mr(s, user_key)?))
}

pub(crate) fn download_diff(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    out: &mut dyn Write,
) -> Result<()> {
    let url = format!("{}/raw_diffs", mr_url(session, owner, repo, pull));
    session.download(&url, None, out)
}

pub(crate) fn pipelines(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
) -> Result<PullChecks> {
    let url = format!("{}/pipelines", mr_url(session, owner, repo, pull));
    Ok(PullChecks::GitLab(super::pipelines::fetch_pipelines(
        session, url,
    )?))
}

/// Merge flags travel as query parameters on the merge endpoint.
pub(crate) fn merge(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    flags: MergeFlags,
) -> Result<()> {
    let url = format!(
        "{}/merge?squash={}&should_remove_source_branch={}",
        mr_url(session, owner, repo, pull),
        flags.squash,
        flags.delete_source,
    );
    session.send("PUT", &url, Some("{}"))?;
    Ok(())
}

pub(crate) fn state_event(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    event: &str,
) -> Result<()> {
    let url = mr_url(session, owner, repo, pull);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("state_event")?;
    r#gen.string(event)?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

/// Opening a merge request needs the numeric target project id; the
/// endpoint does not accept an `owner/name` pair.
pub(crate) fn submit(session: &Session<'_>, opts: &SubmitPullOptions) -> Result<()> {
    let target_id = repos::project_id(session, &opts.owner, &opts.repo)?;

    let url = format!(
        "{}/projects/{}/merge_requests",
        session.base(),
        project_path(&opts.owner, &opts.repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("source_branch")?;
    r#gen.string(&opts.from)?;
    r#gen.objmember("target_branch")?;
    r#gen.string(&opts.to)?;
    r#gen.objmember("title")?;
    r#gen.string(&opts.title)?;
    r#gen.objmember("description")?;
    r#gen.string(&opts.body)?;
    r#gen.objmember("target_project_id")?;
    r#gen.id(target_id)?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;

    if opts.reviewers.is_empty() {
        return Ok(());
    }
    let mut stream = Stream::new(&response.body);
    let created = parse_mr(&mut stream, session.user_key())?;
    for reviewer in &opts.reviewers {
        add_reviewer(session, &opts.owner, &opts.repo, created.number, reviewer)?;
    }
    Ok(())
}

pub(crate) fn commits(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
) -> Result<Vec<Commit>> {
    let url = format!("{}/commits", mr_url(session, owner, repo, pull));
    session.list(
        url,
        None,
        |s, items| {
            s.array(|s| {
                items.push(parse_commit(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

fn parse_commit(s: &mut Stream<'_>) -> DResult<Commit> {
    let mut commit = Commit::default();
    s.object(|s, key| {
        match key {
            "id" => commit.long_sha = s.string()?,
            "short_id" => commit.sha = s.string()?,
            "message" => commit.message = s.string()?,
            "author_name" => commit.author = s.string()?,
            "author_email" => commit.email = s.string()?,
            "created_at" => commit.date = s.string()?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(commit)
}

pub(crate) fn change_labels(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    field: &str,
    labels: &[String],
) -> Result<()> {
    let url = mr_url(session, owner, repo, pull);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember(field)?;
    r#gen.string(&labels.join(","))?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn set_milestone(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    milestone: Option<u64>,
) -> Result<()> {
    let url = mr_url(session, owner, repo, pull);
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

pub(crate) fn add_reviewer(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    username: &str,
) -> Result<()> {
    let id = user_id(session, username)?;
    let url = mr_url(session, owner, repo, pull);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("reviewer_ids")?;
    r#gen.begin_array()?;
    r#gen.id(id)?;
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn set_title(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    title: &str,
) -> Result<()> {
    let url = mr_url(session, owner, repo, pull);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(title)?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn get_comments(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
) -> Result<Vec<Comment>> {
    let url = format!("{}/notes", mr_url(session, owner, repo, pull));
    issues::fetch_notes(session, url)
}

fn mr_url(session: &Session<'_>, owner: &str, repo: &str, pull: u64) -> String {
    format!(
        "{}/projects/{}/merge_requests/{}",
        session.base(),
        project_path(owner, repo),
        pull,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_merge_request() {
        let json = r#"
        {
          "id": 144031955,
          "iid": 63,
          "title": "Fix table rendering",
          "description": "",
          "state": "merged",
          "created_at": "2022-03-01T10:00:00.000Z",
          "author": { "username": "herrhotzenplotz" },
          "source_branch": "table-fixes",
          "target_branch": "trunk",
          "sha": "deadbeefcafe",
          "user_notes_count": 1,
          "labels": ["bug"],
          "milestone": null,
          "work_in_progress": false,
          "merge_status": "can_be_merged",
          "head_pipeline": { "id": 493841023, "coverage": null }
        }"#;
        let mut s = Stream::new(json);
        let pull = parse_mr(&mut s, "username").unwrap();
        assert_eq!(pull.number, 63);
        assert_eq!(pull.id, 144031955);
        assert_eq!(pull.head_label, "table-fixes");
        assert_eq!(pull.base_label, "trunk");
        assert!(pull.merged);
        assert!(pull.mergeable);
        assert!(!pull.draft);
        assert_eq!(pull.head_pipeline_id, 493841023);
        assert_eq!(pull.coverage, None);
    }

    #[test]
    fn coverage_number_is_formatted() {
        let json = r#"{"iid": 1, "head_pipeline": {"id": 7, "coverage": 93.4}}"#;
        let mut s = Stream::new(json);
        let pull = parse_mr(&mut s, "username").unwrap();
        assert_eq!(pull.coverage.as_deref(), Some("93.4"));
    }
}
