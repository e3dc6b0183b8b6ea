//! Bugzilla attachments.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as Base64Standard;
use base64::Engine as _;
use forge_json::Stream;
use forge_types::Attachment;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::parse::DResult;

use super::{session, with_api_key};

fn parse_attachment(s: &mut Stream<'_>) -> DResult<Attachment> {
    let mut attachment = Attachment::default();
    s.object(|s, key| {
        match key {
            "id" => attachment.id = s.uint()?,
            "creator" => attachment.author = s.string()?,
            "creation_time" => attachment.created_at = s.string()?,
            "file_name" => attachment.file_name = s.string()?,
            "summary" => attachment.summary = s.string()?,
            "content_type" => attachment.content_type = s.string()?,
            // Bugzilla booleans are 0/1 numbers.
            "is_obsolete" => attachment.is_obsolete = s.int()? != 0,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(attachment)
}

/// Parses `{"bugs": {"<id>": [attachments...]}}`.
fn parse_attachments_dict(s: &mut Stream<'_>, items: &mut Vec<Attachment>) -> DResult<()> {
    s.object(|s, key| {
        if key != "bugs" {
            s.skip_value()?;
            return Ok(());
        }
        s.object(|s, _bug_id| {
            s.array(|s| {
                items.push(parse_attachment(s)?);
                Ok(())
            })
        })
    })
}

pub(crate) fn get_attachments(ctx: &Context, bug: u64) -> Result<Vec<Attachment>> {
    let session = session(ctx)?;
    let url = with_api_key(
        ctx,
        format!("{}/rest/bug/{}/attachment", session.base(), bug),
    );

    let response = session.get(&url)?;
    let mut stream = Stream::new(&response.body);
    let mut items = Vec::new();
    parse_attachments_dict(&mut stream, &mut items)?;
    Ok(items)
}

/// Fetches the content of a single attachment and writes the decoded
/// bytes to `out`. The wire carries the data base64-encoded inside
/// `{"attachments": {"<id>": {..., "data": "..."}}}`.
pub(crate) fn get_content(ctx: &Context, id: u64, out: &mut dyn Write) -> Result<()> {
    let session = session(ctx)?;
    let url = with_api_key(
        ctx,
        format!("{}/rest/bug/attachment/{}", session.base(), id),
    );

    let response = session.get(&url)?;
    let mut stream = Stream::new(&response.body);
    let mut data = None;
    stream.object(|s, key| {
        if key != "attachments" {
            s.skip_value()?;
            return Ok(());
        }
        s.object(|s, _attachment_id| {
            s.object(|s, key| {
                if key == "data" {
                    data = Some(s.string()?);
                } else {
                    s.skip_value()?;
                }
                Ok(())
            })
        })
    })?;

    let data = data.ok_or_else(|| Error::input(format!("attachment {id} carries no data")))?;
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = Base64Standard
        .decode(cleaned.as_bytes())
        .map_err(|e| Error::input(format!("attachment {id}: bad base64 data: {e}")))?;

    out.write_all(&bytes)
        .map_err(|e| Error::io(format!("attachment {id}"), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_attachment_list() {
        let json = r#"
        {
          "bugs": {
            "1": [
              {
                "id": 227401,
                "creator": "dave.evans@example.org",
                "creation_time": "2021-08-11T19:15:01Z",
                "file_name": "dmesg.txt",
                "summary": "dmesg output",
                "content_type": "text/plain",
                "is_obsolete": 0
              },
              {
                "id": 227402,
                "creator": "dev@example.org",
                "creation_time": "2021-08-12T08:00:00Z",
                "file_name": "fix.patch",
                "summary": "proposed fix",
                "content_type": "text/x-patch",
                "is_obsolete": 1
              }
            ]
          }
        }"#;
        let mut s = Stream::new(json);
        let mut items = Vec::new();
        parse_attachments_dict(&mut s, &mut items).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file_name, "dmesg.txt");
        assert!(!items[0].is_obsolete);
        assert!(items[1].is_obsolete);
    }

    #[test]
    fn attachment_content_is_decoded() {
        // "hello forge\n"
        let json = r#"
        {
          "attachments": {
            "227401": {
              "file_name": "hello.txt",
              "data": "aGVsbG8gZm9yZ2UK"
            }
          }
        }"#;
        let mut stream = Stream::new(json);
        let mut data = None;
        stream
            .object(|s, key| {
                if key != "attachments" {
                    s.skip_value()?;
                    return Ok(());
                }
                s.object(|s, _| {
                    s.object(|s, key| {
                        if key == "data" {
                            data = Some(s.string()?);
                        } else {
                            s.skip_value()?;
                        }
                        Ok(())
                    })
                })
            })
            .unwrap();
        let bytes = Base64Standard.decode(data.unwrap().as_bytes()).unwrap();
        assert_eq!(bytes, b"hello forge\n");
    }
}
