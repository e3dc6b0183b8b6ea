//! GitHub notifications.

use forge_json::{EventKind, Stream};
use forge_types::Notification;

use crate::error::Result;
use crate::parse::DResult;
use crate::session::Session;

fn parse_notification(s: &mut Stream<'_>) -> DResult<Notification> {
    let mut notification = Notification::default();
    s.object(|s, key| {
        match key {
            // GitHub ships thread ids as strings, Gitea as numbers.
            "id" => {
                notification.id = if s.peek_kind()? == EventKind::Num {
                    s.int_to_string()?
                } else {
                    s.string()?
                };
            }
            "reason" => notification.reason = s.nullable_string()?,
            "updated_at" => notification.date = s.string()?,
            "subject" => {
                s.object(|s, key| {
                    match key {
                        "title" => notification.title = s.string()?,
                        "type" => notification.kind = s.string()?,
                        _ => s.skip_value()?,
                    }
                    Ok(())
                })?;
            }
            "repository" => {
                s.object(|s, key| {
                    if key == "full_name" {
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

pub(crate) fn get_notifications(
    session: &Session<'_>,
    max: Option<usize>,
) -> Result<Vec<Notification>> {
    let url = format!("{}/notifications", session.base());
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_notification(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn mark_as_read(session: &Session<'_>, id: &str) -> Result<()> {
    let url = format!("{}/notifications/threads/{}", session.base(), id);
    session.send("PATCH", &url, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_notification_fields() {
        let json = r#"
        {
          "id": "2543149077",
          "reason": "author",
          "updated_at": "2022-03-22T16:06:10Z",
          "subject": {
            "title": "Snippet support",
            "type": "Issue"
          },
          "repository": {
            "full_name": "herrhotzenplotz/gearbox"
          }
        }"#;
        let mut s = Stream::new(json);
        let n = parse_notification(&mut s).unwrap();
        assert_eq!(n.id, "2543149077");
        assert_eq!(n.kind, "Issue");
        assert_eq!(n.title, "Snippet support");
        assert_eq!(n.reason.as_deref(), Some("author"));
        assert_eq!(n.repository, "herrhotzenplotz/gearbox");
    }
}
