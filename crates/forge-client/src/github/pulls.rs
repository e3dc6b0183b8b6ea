//! GitHub pull requests.

use std::io::Write;

use forge_http::urlencode;
use forge_json::{EventKind, JsonGen, Stream};
use forge_types::{Commit, MergeFlags, Pull, PullFilter, SubmitPullOptions};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

/// Parses one pull object (list item or full summary).
pub(crate) fn parse_pull(s: &mut Stream<'_>, user_key: &str) -> DResult<Pull> {
    let mut pull = Pull::default();
    s.object(|s, key| {
        match key {
            "number" => pull.number = s.uint()?,
            "id" => pull.id = s.uint()?,
            "title" => pull.title = s.string()?,
            "body" => pull.body = parse::text(s)?,
            "state" => pull.state = s.string()?,
            "created_at" => pull.created_at = s.string()?,
            "user" => pull.author = s.user(user_key)?,
            "head" => {
                let (label, sha) = parse_branch(s)?;
                pull.head_label = label;
                pull.head_sha = sha;
            }
            "base" => {
                let (label, sha) = parse_branch(s)?;
                pull.base_label = label;
                pull.base_sha = sha;
            }
            "merged" => pull.merged = s.boolean()?,
            "merged_at" => {
                // List items carry no "merged" flag; a merge timestamp
                // is just as authoritative.
                if s.nullable_string()?.is_some() {
                    pull.merged = true;
                }
            }
            "mergeable" => pull.mergeable = s.boolean()?,
            "draft" => pull.draft = s.boolean()?,
            "comments" => pull.comments_count = s.int()? as i32,
            "additions" => pull.additions = s.int()? as i32,
            "deletions" => pull.deletions = s.int()? as i32,
            "commits" => pull.commits = s.int()? as i32,
            "changed_files" => pull.changed_files = s.int()? as i32,
            "labels" => pull.labels = parse::label_objects(s)?,
            "requested_reviewers" => pull.reviewers = parse::user_array(s, user_key)?,
            "milestone" => pull.milestone = parse::milestone_title(s)?,
            "auto_merge" => {
                pull.automerge = s.peek_kind()? != EventKind::Null;
                s.skip_value()?;
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(pull)
}

/// Parses a `head`/`base` ref object into `(label, sha)`.
fn parse_branch(s: &mut Stream<'_>) -> DResult<(String, String)> {
    let mut label = String::new();
    let mut sha = String::new();
    s.object(|s, key| {
        match key {
            "label" => label = parse::text(s)?,
            "sha" => sha = s.string()?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok((label, sha))
}

pub(crate) fn search(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    filter: &PullFilter,
    max: Option<usize>,
) -> Result<Vec<Pull>> {
    let url = format!(
        "{}/repos/{}/{}/pulls?state={}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        if filter.all { "all" } else { "open" },
    );

    // The pulls endpoint has no creator/label parameters; those filters
    // are applied to the accumulated list in place.
    let author = filter.author.clone();
    let label = filter.label.clone();
    let milestone = filter.milestone.clone();
    let post_filter = move |items: &mut Vec<Pull>| {
        if let Some(author) = &author {
            items.retain(|pull| &pull.author == author);
        }
        if let Some(label) = &label {
            items.retain(|pull| pull.labels.iter().any(|l| l == label));
        }
        if let Some(milestone) = &milestone {
            items.retain(|pull| pull.milestone.as_deref() == Some(milestone.as_str()));
        }
    };

    let user_key = session.user_key();
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_pull(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        Some(&post_filter),
    )
}

pub(crate) fn get(session: &Session<'_>, owner: &str, repo: &str, pull: u64) -> Result<Pull> {
    let url = pull_url(session, owner, repo, pull);
    let user_key = session.user_key();
    session.get_parsed(&url, |s| Ok(parse_pull(s, user_key)?))
}

/// Streams the diff or patch representation, selected by `accept`.
pub(crate) fn download(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    accept: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let url = pull_url(session, owner, repo, pull);
    session.download(&url, Some(accept), out)
}

pub(crate) fn patch_state(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    state: &str,
) -> Result<()> {
    let url = pull_url(session, owner, repo, pull);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("state")?;
    r#gen.string(state)?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn merge(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    flags: MergeFlags,
) -> Result<()> {
    // The source branch name is only present on the pull summary, so it
    // has to be fetched before the merge changes the pull's state.
    let head_branch = if flags.delete_source {
        let summary = get(session, owner, repo, pull)?;
        let branch = summary
            .head_label
            .split_once(':')
            .map_or(summary.head_label.clone(), |(_, branch)| branch.to_string());
        Some(branch)
    } else {
        None
    };

    let url = format!("{}/merge", pull_url(session, owner, repo, pull));
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("merge_method")?;
    r#gen.string(if flags.squash { "squash" } else { "merge" })?;
    r#gen.end_object()?;

    session.send("PUT", &url, Some(&r#gen.into_string()))?;

    // A failed branch delete fails the whole operation even though the
    // merge itself went through.
    if let Some(branch) = head_branch {
        let url = format!(
            "{}/repos/{}/{}/git/refs/heads/{}",
            session.base(),
            urlencode(owner),
            urlencode(repo),
            urlencode(&branch),
        );
        session.send("DELETE", &url, None)?;
    }

    Ok(())
}

pub(crate) fn submit(session: &Session<'_>, opts: &SubmitPullOptions) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/pulls",
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
    r#gen.objmember("head")?;
    r#gen.string(&opts.from)?;
    r#gen.objmember("base")?;
    r#gen.string(&opts.to)?;
    r#gen.objmember("draft")?;
    r#gen.boolean(opts.draft)?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;

    if opts.reviewers.is_empty() {
        return Ok(());
    }

    let mut stream = Stream::new(&response.body);
    let created = parse_pull(&mut stream, session.user_key())?;
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
    let url = format!("{}/commits", pull_url(session, owner, repo, pull));
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
            "sha" => {
                commit.long_sha = s.string()?;
                commit.sha = commit.long_sha.chars().take(8).collect();
            }
            "commit" => {
                s.object(|s, key| {
                    match key {
                        "message" => commit.message = s.string()?,
                        "author" => {
                            s.object(|s, key| {
                                match key {
                                    "name" => commit.author = s.string()?,
                                    "email" => commit.email = s.string()?,
                                    "date" => commit.date = s.string()?,
                                    _ => s.skip_value()?,
                                }
                                Ok(())
                            })?;
                        }
                        _ => s.skip_value()?,
                    }
                    Ok(())
                })?;
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(commit)
}

pub(crate) fn add_reviewer(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    username: &str,
) -> Result<()> {
    let url = format!(
        "{}/requested_reviewers",
        pull_url(session, owner, repo, pull),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("reviewers")?;
    r#gen.begin_array()?;
    r#gen.string(username)?;
    r#gen.end_array()?;
    r#gen.end_object()?;

    session.send("POST", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

pub(crate) fn set_title(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
    title: &str,
) -> Result<()> {
    let url = pull_url(session, owner, repo, pull);
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(title)?;
    r#gen.end_object()?;

    session.send("PATCH", &url, Some(&r#gen.into_string()))?;
    Ok(())
}

fn pull_url(session: &Session<'_>, owner: &str, repo: &str, pull: u64) -> String {
    format!(
        "{}/repos/{}/{}/pulls/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        pull,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIMPLE_PULL: &str = r#"
    {
      "id": 886044243,
      "number": 99,
      "title": "mark notifications as read/done",
      "state": "closed",
      "created_at": "2022-03-15T18:42:03Z",
      "user": { "login": "herrhotzenplotz" },
      "body": "This adds support for notifications",
      "head": {
        "label": "herrhotzenplotz:99",
        "sha": "a00f475af1e31d56c7a5839508a21e2b76a31e49"
      },
      "base": {
        "label": "herrhotzenplotz:trunk",
        "sha": "f9c7e7d9a4bbbabd3e50cb90c08a0a8e59c2135d"
      },
      "merged": true,
      "mergeable": false,
      "draft": false,
      "comments": 0,
      "additions": 177,
      "deletions": 82,
      "commits": 6,
      "changed_files": 13,
      "labels": [],
      "requested_reviewers": [],
      "milestone": null,
      "auto_merge": null
    }"#;

    #[test]
    fn parse_simple_pull() {
        let mut s = Stream::new(SIMPLE_PULL);
        let pull = parse_pull(&mut s, "login").unwrap();

        assert_eq!(pull.id, 886044243);
        assert_eq!(pull.author, "herrhotzenplotz");
        assert_eq!(pull.state, "closed");
        assert_eq!(pull.title, "mark notifications as read/done");
        assert_eq!(pull.comments_count, 0);
        assert_eq!(pull.additions, 177);
        assert_eq!(pull.deletions, 82);
        assert_eq!(pull.commits, 6);
        assert_eq!(pull.changed_files, 13);
        assert!(pull.merged);
        assert!(!pull.mergeable);
        assert!(!pull.draft);
        assert!(!pull.automerge);
        assert_eq!(pull.head_label, "herrhotzenplotz:99");
        assert_eq!(pull.base_label, "herrhotzenplotz:trunk");
        assert_eq!(pull.head_sha, "a00f475af1e31d56c7a5839508a21e2b76a31e49");
    }

    #[test]
    fn merged_at_in_list_items_marks_merged() {
        let mut s = Stream::new(r#"{"number": 4, "merged_at": "2022-01-01T00:00:00Z"}"#);
        let pull = parse_pull(&mut s, "login").unwrap();
        assert!(pull.merged);

        let mut s = Stream::new(r#"{"number": 5, "merged_at": null}"#);
        let pull = parse_pull(&mut s, "login").unwrap();
        assert!(!pull.merged);
    }

    #[test]
    fn null_mergeable_defaults_false() {
        // GitHub reports null while the merge state is being computed.
        let mut s = Stream::new(r#"{"number": 6, "mergeable": null}"#);
        let pull = parse_pull(&mut s, "login").unwrap();
        assert!(!pull.mergeable);
    }

    #[test]
    fn parse_pull_commit() {
        let json = r#"
        {
          "sha": "a00f475af1e31d56c7a5839508a21e2b76a31e49",
          "commit": {
            "message": "notifications: add mark as done",
            "author": {
              "name": "Nico",
              "email": "nico@example.org",
              "date": "2022-03-15T18:41:00Z"
            }
          }
        }"#;
        let mut s = Stream::new(json);
        let commit = parse_commit(&mut s).unwrap();
        assert_eq!(commit.sha, "a00f475a");
        assert_eq!(commit.long_sha, "a00f475af1e31d56c7a5839508a21e2b76a31e49");
        assert_eq!(commit.author, "Nico");
        assert_eq!(commit.email, "nico@example.org");
        assert_eq!(commit.message, "notifications: add mark as done");
    }
}
