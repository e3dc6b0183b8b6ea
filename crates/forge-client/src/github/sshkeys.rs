//! GitHub SSH key management.

use std::path::Path;

use forge_json::{JsonGen, Stream};
use forge_types::SshKey;

use crate::error::{Error, Result};
use crate::parse::DResult;
use crate::session::Session;

pub(crate) fn parse_key(s: &mut Stream<'_>) -> DResult<SshKey> {
    let mut key = SshKey::default();
    s.object(|s, k| {
        match k {
            "id" => key.id = s.uint()?,
            "title" => key.title = s.string()?,
            "key" => key.key = s.string()?,
            "created_at" => key.created_at = s.string()?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(key)
}

pub(crate) fn get_keys(session: &Session<'_>) -> Result<Vec<SshKey>> {
    let url = format!("{}/user/keys", session.base());
    session.list(
        url,
        None,
        |s, items| {
            s.array(|s| {
                items.push(parse_key(s)?);
                Ok(())
            })?;
            Ok(())
        },
        None,
    )
}

pub(crate) fn add(session: &Session<'_>, title: &str, public_key_path: &Path) -> Result<SshKey> {
    let key_data = std::fs::read_to_string(public_key_path)
        .map_err(|e| Error::io(public_key_path.display().to_string(), e))?;

    let url = format!("{}/user/keys", session.base());
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("title")?;
    r#gen.string(title)?;
    r#gen.objmember("key")?;
    r#gen.string(key_data.trim_end())?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;
    let mut stream = Stream::new(&response.body);
    Ok(parse_key(&mut stream)?)
}

pub(crate) fn delete(session: &Session<'_>, id: u64) -> Result<()> {
    let url = format!("{}/user/keys/{}", session.base(), id);
    session.send("DELETE", &url, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_key_fields() {
        let json = r#"
        {
          "id": 61377878,
          "title": "laptop",
          "key": "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIMom",
          "created_at": "2022-01-10T12:00:00Z"
        }"#;
        let mut s = Stream::new(json);
        let key = parse_key(&mut s).unwrap();
        assert_eq!(key.id, 61377878);
        assert_eq!(key.title, "laptop");
        assert!(key.key.starts_with("ssh-ed25519"));
    }
}
