//! GitHub check runs.

use forge_http::urlencode;
use forge_json::Stream;
use forge_types::{Check, PullChecks};

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

use super::pulls;

fn parse_check(s: &mut Stream<'_>) -> DResult<Check> {
    let mut check = Check::default();
    s.object(|s, key| {
        match key {
            "id" => check.id = s.int()?,
            "name" => check.name = s.string()?,
            "status" => check.status = s.string()?,
            "conclusion" => check.conclusion = parse::text(s)?,
            "started_at" => check.started_at = parse::text(s)?,
            "completed_at" => check.completed_at = parse::text(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(check)
}

/// Parses one `check-runs` page: `{total_count, check_runs: [...]}`.
fn parse_checks_page(s: &mut Stream<'_>, items: &mut Vec<Check>) -> DResult<()> {
    s.object(|s, key| {
        if key == "check_runs" {
            s.array(|s| {
                items.push(parse_check(s)?);
                Ok(())
            })?;
        } else {
            s.skip_value()?;
        }
        Ok(())
    })
}

/// Lists the checks attached to a commit ref.
pub(crate) fn get_checks(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    git_ref: &str,
) -> Result<Vec<Check>> {
    let url = format!(
        "{}/repos/{}/{}/commits/{}/check-runs",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        urlencode(git_ref),
    );
    session.list(
        url,
        None,
        |s, items| {
            parse_checks_page(s, items)?;
            Ok(())
        },
        None,
    )
}

/// Checks of a pull request run against its head commit.
pub(crate) fn pull_checks(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    pull: u64,
) -> Result<PullChecks> {
    let summary = pulls::get(session, owner, repo, pull)?;
    let checks = get_checks(session, owner, repo, &summary.head_sha)?;
    Ok(PullChecks::GitHub(checks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_check_runs_page() {
        let json = r#"
        {
          "total_count": 2,
          "check_runs": [
            {
              "id": 5097687568,
              "name": "ci/freebsd",
              "status": "completed",
              "conclusion": "success",
              "started_at": "2022-03-22T10:30:00Z",
              "completed_at": "2022-03-22T10:33:12Z"
            },
            {
              "id": 5097687569,
              "name": "ci/linux",
              "status": "in_progress",
              "conclusion": null,
              "started_at": "2022-03-22T10:30:01Z",
              "completed_at": null
            }
          ]
        }"#;
        let mut s = Stream::new(json);
        let mut checks = Vec::new();
        parse_checks_page(&mut s, &mut checks).unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].name, "ci/freebsd");
        assert_eq!(checks[0].conclusion, "success");
        assert_eq!(checks[1].conclusion, "");
        assert_eq!(checks[1].completed_at, "");
    }
}
