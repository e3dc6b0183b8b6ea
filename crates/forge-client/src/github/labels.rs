//! GitHub labels.

use forge_http::urlencode;
use forge_json::{decode, JsonGen, Stream};
use forge_types::Label;

use crate::error::Result;
use crate::parse::{self, DResult};
use crate::session::Session;

pub(crate) fn parse_label(s: &mut Stream<'_>) -> DResult<Label> {
    let mut label = Label::default();
    s.object(|s, key| {
        match key {
            "id" => label.id = s.uint()?,
            "name" => label.name = s.string()?,
            "description" => label.description = parse::text(s)?,
            "color" => label.color = decode::github_color(s)?,
            _ => s.skip_value()?,
        }
        Ok(())
    })?;
    Ok(label)
}

pub(crate) fn get_labels(
    session: &Session<'_>,
    owner: &str,
    repo: &str,
    max: Option<usize>,
) -> Result<Vec<Label>> {
    let url = format!(
        "{}/repos/{}/{}/labels",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    session.list(
        url,
        max,
        |s, items| {
            s.array(|s| {
                items.push(parse_label(s)?);
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
    label: &mut Label,
) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/labels",
        session.base(),
        urlencode(owner),
        urlencode(repo),
    );
    let mut r#gen = JsonGen::new();
    r#gen.begin_object()?;
    r#gen.objmember("name")?;
    r#gen.string(&label.name)?;
    r#gen.objmember("description")?;
    r#gen.string(&label.description)?;
    r#gen.objmember("color")?;
    r#gen.string(&format!("{:06x}", label.color >> 8))?;
    r#gen.end_object()?;

    let response = session.send("POST", &url, Some(&r#gen.into_string()))?;
    let mut stream = Stream::new(&response.body);
    let created = parse_label(&mut stream)?;
    label.id = created.id;
    Ok(())
}

pub(crate) fn delete(session: &Session<'_>, owner: &str, repo: &str, name: &str) -> Result<()> {
    let url = format!(
        "{}/repos/{}/{}/labels/{}",
        session.base(),
        urlencode(owner),
        urlencode(repo),
        urlencode(name),
    );
    session.send("DELETE", &url, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_simple_label() {
        let json = r#"
        {
          "id": 3431203676,
          "node_id": "LA_kwDOFO6hDs7Mir1c",
          "name": "bug",
          "description": "Something isn't working",
          "color": "d73a4a",
          "default": true
        }"#;
        let mut s = Stream::new(json);
        let label = parse_label(&mut s).unwrap();
        assert_eq!(label.id, 3431203676);
        assert_eq!(label.name, "bug");
        assert_eq!(label.description, "Something isn't working");
        assert_eq!(label.color, 0xd73a4a00);
    }
}
