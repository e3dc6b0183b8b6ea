//! GitHub forks.

use forge_http::urlencode;
use forge_json::{JsonGen, Stream};
use forge_types::Fork;

use crate::error::Result;
use crate::parse::DResult;
use crate::session::Session;

pub(crate) fn parse_fork(s: &mut Stream<'_>, user_key: &str) -> DResult<Fork> {
    let mut fork = Fork::default();
    s.object(|s, key| {
        match key {
            "full_name" => fork.full_name = s.string()?,
            "owner" => fork.owner = s.user(user_key)?,
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
        "{}/repos/{}/{}/forks",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    let user_key = session.user_key();
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_fork(s, user_key)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn create(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    into: Option<&str>,
) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/forks",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    let payload = match into {
        Some(into) => {
            let mut r#gen = JsonGen::new();
            r#gen.begin_object()?;
            r#gen.objmember("organization")?;
            r#gen.string(into)?;
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
    fn parse_fork_fields() {
        let json = r#"
        {
          "full_name": "contrib/gearbox",
          "owner": { "login": "contrib" },
          "created_at": "2022-01-01T00:00:00Z",
          "forks_count": 3
        }"#;
        let mut s = Stream::new(json);
        let fork = parse_fork(&mut s, "login").unwrap();
        assert_eq!(fork.full_name, "contrib/gearbox");
        assert_eq!(fork.owner, "contrib");
        assert_eq!(fork.forks_count, 3);
    }
}
