//! GitLab SSH key management.

use std::path::Path;

use forge_json::{JsonGen, Stream};
use forge_types::SshKey;

use crate::error::{Error, Result};
use crate::parse::DResult;
use crate::session::Session;

fn parse_key(s: &mut Stream<'_>) -> DResult<SshKey> {
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
