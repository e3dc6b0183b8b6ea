//! Bugzilla bugs and their comments.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Comment, Issue, IssueFilter, SubmitIssueOptions};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::parse::{self, DResult};
use crate::session::Session;

use super::{session, with_api_key};

pub(crate) fn parse_bug(s: &mut Stream<'_>) -> DResult<Issue> {
    let mut issue = Issue::default();
    s.object(|s, key| {
        match key {
            "id" => issue.number = s.uint()?,
            "summary" => issue.title = s.string()?,
            "creation_time" => issue.created_at = s.string()?,
            "creator_detail" => {
                s.object(|s, key| {
                    match key {
                        "real_name" => issue.author = s.string()?,
                        "name" if issue.author.is_empty() => issue.author = s.string()?,
                        _ => s.skip_value()?,
                    }
                    Ok(())
                })?;
            }
            "status" => issue.state = s.string()?,
            "product" => issue.product = Some(s.string()?),
            "component" => issue.component = Some(s.string()?),
            "url" => {
                let url = parse::text(s)?;
                if !url.is_empty() {
                    issue.url = Some(url);
                }
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(issue)
}

/// Parses a `{"bugs": [...]}` response into the accumulated list.
pub(crate) fn parse_bugs_page(s: &mut Stream<'_>, items: &mut Vec<Issue>) -> DResult<()> {
    s.object(|s, key| {
        if key == "bugs" {
            s.array(|s| {
                items.push(parse_bug(s)?);
                Ok(())
            })?;
        } else {
            s.skip_value()?;
        }
        Ok(())
    })
}

pub(crate) fn search(
    ctx: &Context,
    product: &str,
    component: &str,
    filter: &IssueFilter,
    max: Option<usize>,
) -> Result<Vec<Issue>> {
    let session = session(ctx)?;

    // The order parameter is mostly undocumented; bug_id descending
    // matches what the web UI calls "newest first". limit=0 lifts the
    // server-side cap.
    let mut url = format!(
        "{}/rest/bug?order=bug_id%20DESC%2C&limit={}",
        session.base(),
        max.unwrap_or(0),
    );
    url.push_str(if filter.all {
        "&status=All"
    } else {
        "&status=Open&status=New"
    });
    if !product.is_empty() {
        url.push_str(&format!("&product={}", urlencode(product)));
    }
    if !component.is_empty() {
        url.push_str(&format!("&component={}", urlencode(component)));
    }
    if let Some(author) = &filter.author {
        url.push_str(&format!("&creator={}", urlencode(author)));
    }
    let url = with_api_key(ctx, url);

    let mut items = Vec::new();
    let response = session.get(&url)?;
    let mut stream = Stream::new(&response.body);
    parse_bugs_page(&mut stream, &mut items)?;
    if let Some(max) = max {
        items.truncate(max);
    }
    Ok(items)
}

pub(crate) fn get_summary(ctx: &Context, bug: u64) -> Result<Issue> {
    let session = session(ctx)?;
    let url = with_api_key(ctx, format!("{}/rest/bug?id={}", session.base(), bug));

    let response = session.get(&url)?;
    let mut stream = Stream::new(&response.body);
    let mut items = Vec::new();
    parse_bugs_page(&mut stream, &mut items)?;
    let mut issue = items
        .into_iter()
        .next()
        .ok_or_else(|| Error::input(format!("bug {bug} not found")))?;

    // The first comment of a bug is its description.
    issue.body = get_description(ctx, &session, bug)?.unwrap_or_default();
    Ok(issue)
}

fn parse_comment(s: &mut Stream<'_>) -> DResult<Comment> {
    let mut comment = Comment::default();
    s.object(|s, key| {
        match key {
            "id" => comment.id = s.uint()?,
            "creator" => comment.author = s.string()?,
            "creation_time" => comment.date = s.string()?,
            "text" => comment.body = parse::text(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(comment)
}

/// Unwraps the `{"bugs": {"<id>": {"comments": [...]}}}` dictionary and
/// hands the comments array to `f`.
fn with_comments_array<F>(s: &mut Stream<'_>, mut f: F) -> DResult<()>
where
    F: FnMut(&mut Stream<'_>) -> DResult<()>,
{
    s.object(|s, key| {
        if key != "bugs" {
            s.skip_value()?;
            return Ok(());
        }
        // One entry per requested bug id; the key is synthetic.
        s.object(|s, _bug_id| {
            s.object(|s, key| {
                if key == "comments" {
                    f(s)?;
                } else {
                    s.skip_value()?;
                }
                Ok(())
            })
        })
    })
}

pub(crate) fn get_comments(ctx: &Context, bug: u64) -> Result<Vec<Comment>> {
    let session = session(ctx)?;
    let url = with_api_key(
        ctx,
        format!("{}/rest/bug/{}/comment", session.base(), bug),
    );

    let response = session.get(&url)?;
    let mut stream = Stream::new(&response.body);
    let mut comments = Vec::new();
    let mut first = true;
    with_comments_array(&mut stream, |s| {
        s.array(|s| {
            if first {
                // The first entry is the bug's description, not a comment.
                first = false;
                s.skip_value()?;
            } else {
                comments.push(parse_comment(s)?);
            }
            Ok(())
        })
    })?;
    Ok(comments)
}

/// Fetches only the first comment of a bug: its description text.
fn get_description(ctx: &Context, session: &Session<'_>, bug: u64) -> Result<Option<String>> {
    let url = with_api_key(
        ctx,
        format!("{}/rest/bug/{}/comment", session.base(), bug),
    );

    let response = session.get(&url)?;
    let mut stream = Stream::new(&response.body);
    let mut description = None;
    with_comments_array(&mut stream, |s| {
        s.array(|s| {
            if description.is_none() {
                description = Some(parse_comment(s)?.body);
            } else {
                s.skip_value()?;
            }
            Ok(())
        })
    })?;
    Ok(description)
}

pub(crate) fn submit(ctx: &Context, opts: &SubmitIssueOptions) -> Result<Issue> {
    let product = opts
        .product
        .as_deref()
        .unwrap_or(opts.owner.as_str());
    let component = opts
        .component
        .as_deref()
        .unwrap_or(opts.repo.as_str());
    if product.is_empty() || component.is_empty() {
        return Err(Error::input(
            "submitting a bug requires a product and a component",
        ));
    }

    let session = session(ctx)?;
    let url = with_api_key(ctx, format!("{}/rest/bug", session.base()));

    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("product")?;
    r#gen.string(product)?;
    r#gen.objmember("component")?;
    r#gen.string(component)?;
    r#gen.objmember("summary")?;
    r#gen.string(&opts.title)?;
    r#gen.objmember("description")?;
    r#gen.string(&opts.body)?;
    r#gen.objmember("version")?;
    r#gen.string("unspecified")?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;
    let mut stream = Stream::new(&response.body);
    let mut id = 0;
    stream.object(|s, key| {
        if key == "id" {
            id = s.uint()?;
        } else {
            s.skip_value()?;
        }
        Ok(())
    })?;

    Ok(Issue {
        number: id,
        title: opts.title.clone(),
        body: opts.body.clone(),
        product: Some(product.to_string()),
        component: Some(component.to_string()),
        state: "New".to_string(),
        ..Issue::default()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIMPLE_BUG: &str = r#"
    {
      "bugs": [
        {
          "id": 1,
          "summary": "[aha] [scsi] Toshiba MK156FB scsi drive does not work with 2.0 kernel",
          "creation_time": "1994-09-14T09:10:01Z",
          "creator": "dave.evans@example.org",
          "creator_detail": {
            "name": "dave.evans@example.org",
            "real_name": "Dave Evans"
          },
          "status": "Closed",
          "product": "Base System",
          "component": "kern",
          "url": ""
        }
      ]
    }"#;

    #[test]
    fn parse_simple_bug() {
        let mut s = Stream::new(SIMPLE_BUG);
        let mut items = Vec::new();
        parse_bugs_page(&mut s, &mut items).unwrap();
        assert_eq!(items.len(), 1);

        let bug = &items[0];
        assert_eq!(bug.number, 1);
        assert_eq!(
            bug.title,
            "[aha] [scsi] Toshiba MK156FB scsi drive does not work with 2.0 kernel"
        );
        assert_eq!(bug.created_at, "1994-09-14T09:10:01Z");
        assert_eq!(bug.author, "Dave Evans");
        assert_eq!(bug.state, "Closed");
        assert_eq!(bug.product.as_deref(), Some("Base System"));
        assert_eq!(bug.component.as_deref(), Some("kern"));
        assert!(!bug.is_pr);
    }

    #[test]
    fn comments_dictionary_skips_description() {
        let json = r#"
        {
          "bugs": {
            "17": {
              "comments": [
                { "id": 100, "creator": "reporter", "creation_time": "t0", "text": "the description" },
                { "id": 101, "creator": "dev", "creation_time": "t1", "text": "first reply" },
                { "id": 102, "creator": "reporter", "creation_time": "t2", "text": "second reply" }
              ]
            }
          },
          "comments": {}
        }"#;
        let mut s = Stream::new(json);
        let mut comments = Vec::new();
        let mut first = true;
        with_comments_array(&mut s, |s| {
            s.array(|s| {
                if first {
                    first = false;
                    s.skip_value()?;
                } else {
                    comments.push(parse_comment(s)?);
                }
                Ok(())
            })
        })
        .unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "first reply");
        assert_eq!(comments[1].author, "reporter");
    }

    #[test]
    fn only_first_comment_is_the_description() {
        let json = r#"
        {
          "bugs": {
            "17": {
              "comments": [
                { "id": 100, "creator": "reporter", "creation_time": "t0", "text": "the description" },
                { "id": 101, "creator": "dev", "creation_time": "t1", "text": "first reply" }
              ]
            }
          }
        }"#;
        let mut s = Stream::new(json);
        let mut description = None;
        with_comments_array(&mut s, |s| {
            s.array(|s| {
                if description.is_none() {
                    description = Some(parse_comment(s)?.body);
                } else {
                    s.skip_value()?;
                }
                Ok(())
            })
        })
        .unwrap();
        assert_eq!(description.as_deref(), Some("the description"));
    }
}
