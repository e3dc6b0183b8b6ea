//! GitLab todos, mapped onto the uniform notification shape.

use forge_json::Stream;
use forge_types::Notification;

use crate::error::Result;
use crate::parse::DResult;
use crate::session::Session;

fn parse_todo(s: &mut Stream<'_>) -> DResult<Notification> {
    let mut notification = Notification::default();
    s.object(|s, key| {
        match key {
            "id" => notification.id = s.int_to_string()?,
            "action_name" => notification.reason = s.nullable_string()?,
            "created_at" => notification.date = s.string()?,
            "target_type" => notification.kind = s.string()?,
            "target" => {
                s.object(|s, key| {
                    if key == "title" {
                        notification.title = s.string()?;
                    } else {
                        s.skip_value()?;
                    }
                    Ok(())
                })?;
            }
            "project" => {
                s.object(|s, key| {
                    if key == "path_with_namespace" {
                        notification.repository = s.string()?;
                    } else {
                        s.skip_value()?;
                    }
                    Ok(())
                })?;
            }
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(notification)
}

pub(crate) fn get_todos(session: &Session<'_>, max: Option<usize>) -> Result<Vec<Notification>> {
    let url = format!("{}/todos", session.base());
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_todo(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn mark_as_done(session: &Session<'_>, id: &str) -> Result<()> {
    let url = format!("{}/todos/{}/mark_as_done", session.base(), id);
    session.send("POST", &url, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_todo_fields() {
        let json = r#"
        {
          "id": 102334120,
          "action_name": "assigned",
          "created_at": "2022-03-18T09:00:00.000Z",
          "target_type": "MergeRequest",
          "target": { "title": "Fix table rendering" },
          "project": { "path_with_namespace": "herrhotzenplotz/gearbox" }
        }"#;
        let mut s = Stream::new(json);
        let n = parse_todo(&mut s).unwrap();
        assert_eq!(n.id, "102334120");
        assert_eq!(n.kind, "MergeRequest");
        assert_eq!(n.reason.as_deref(), Some("assigned"));
        assert_eq!(n.repository, "herrhotzenplotz/gearbox");
    }
}
