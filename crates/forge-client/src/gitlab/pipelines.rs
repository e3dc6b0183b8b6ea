//! GitLab pipelines.

use forge_json::Stream;
use forge_types::Pipeline;

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

pub(crate) fn parse_pipeline(s: &mut Stream<'_>) -> DResult<Pipeline> {
    let mut pipeline = Pipeline::default();
    s.object(|s, key| {
        match key {
            "id" => pipeline.id = s.int()?,
            "status" => pipeline.status = s.string()?,
            "created_at" => pipeline.created_at = s.string()?,
            "updated_at" => pipeline.updated_at = s.string()?,
            "ref" => pipeline.refname = parse::text(s)?,
            "sha" => pipeline.sha = parse::text(s)?,
            "source" => pipeline.source = parse::text(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(pipeline)
}

pub(crate) fn fetch_pipelines(session: &Session<'_>, url: String) -> Result<Vec<Pipeline>> {
    session.list(
        url,
        None,
        |s, items| {
            s.array(|s| {
                items.push(parse_pipeline(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_pipeline_fields() {
        let json = r#"
        {
          "id": 493841023,
          "status": "success",
          "created_at": "2022-03-01T10:01:00.000Z",
          "updated_at": "2022-03-01T10:07:21.000Z",
          "ref": "refs/merge-requests/63/head",
          "sha": "deadbeefcafe",
          "source": "merge_request_event"
        }"#;
        let mut s = Stream::new(json);
        let pipeline = parse_pipeline(&mut s).unwrap();
        assert_eq!(pipeline.id, 493841023);
        assert_eq!(pipeline.status, "success");
        assert_eq!(pipeline.refname, "refs/merge-requests/63/head");
        assert_eq!(pipeline.source, "merge_request_event");
    }
}
