//! GitHub issue/pull comments.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::{Comment, SubmitCommentOptions};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

pub(crate) fn parse_comment(s: &mut Stream<'_>, user_key: &str) -> DResult<Comment> {
    let mut comment = Comment::default();
    s.object(|s, key| {
        match key {
            "id" => comment.id = s.uint()?,
            "user" => comment.author = s.user(user_key)?,
            "created_at" => comment.date = s.string()?,
            "body" => comment.body = parse::text(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(comment)
}

/// Lists comments on an issue or pull; GitHub serves both through the
/// issues endpoint.
pub(crate) fn get_comments(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    issue: u64,
) -> Result<Vec<Comment>> {
    let url = format!(
        "{}/repos/{}/{}/issues/{}/comments",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        issue,
    );
    let user_key = session.user_key();
    session.list(
        url,
        None,
        |s, items| {
            s.array(|s| {
                items.push(parse_comment(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn submit(session: &Session<'_>, opts: &SubmitCommentOptions) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/issues/{}/comments",
        session.base(),
        urlencode(&opts.owner),
        urlencode(&opts.repo),
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_comment_fields() {
        let json = r#"
        {
          "id": 1072394018,
          "user": { "login": "herrhotzenplotz" },
          "created_at": "2022-03-18T20:08:25Z",
          "body": "fixed in trunk"
        }"#;
        let mut s = Stream::new(json);
        let comment = parse_comment(&mut s, "login").unwrap();
        assert_eq!(comment.id, 1072394018);
        assert_eq!(comment.author, "herrhotzenplotz");
        assert_eq!(comment.date, "2022-03-18T20:08:25Z");
        assert_eq!(comment.body, "fixed in trunk");
    }
}
