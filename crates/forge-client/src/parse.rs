//! Small parse helpers shared between backends.

use forge_json::{EventKind, Stream};

/// Result alias for parser-internal helpers; converted to the client
/// error at operation boundaries.
pub(crate) type DResult<T> = forge_json::decode::Result<T>;

/// Consumes a milestone object (or null), returning its title.
pub(crate) fn milestone_title(s: &mut Stream<'_>) -> DResult<Option<String>> {
    if s.peek_kind()? == EventKind::Null {
        s.next_event()?;
        return Ok(None);
    }
    let mut title = None;
    s.object(|s, key| {
        if key == "title" {
            title = Some(s.string()?);
        } else {
            s.skip_value()?;
        }
        Ok(())
    })?;
    Ok(title)
}

/// Consumes an array of user objects (or null), returning their names.
pub(crate) fn user_array(s: &mut Stream<'_>, user_key: &str) -> DResult<Vec<String>> {
    let mut users = Vec::new();
    if s.peek_kind()? == EventKind::Null {
        s.next_event()?;
        return Ok(users);
    }
    s.array(|s| {
        users.push(s.user(user_key)?);
        Ok(())
    })?;
    Ok(users)
}

/// Consumes an array of label objects, returning their names.
pub(crate) fn label_objects(s: &mut Stream<'_>) -> DResult<Vec<String>> {
    let mut labels = Vec::new();
    if s.peek_kind()? == EventKind::Null {
        s.next_event()?;
        return Ok(labels);
    }
    s.array(|s| {
        labels.push(s.label_name()?);
        Ok(())
    })?;
    Ok(labels)
}

/// Consumes a string field that may be null, defaulting to empty.
pub(crate) fn text(s: &mut Stream<'_>) -> DResult<String> {
    Ok(s.nullable_string()?.unwrap_or_default())
}
