//! Incremental JSON payload builder.
//!
//! [`JsonGen`] tracks a bounded stack of object/array scopes and inserts
//! commas and key/value colons itself, so request construction code reads
//! as a flat sequence of calls. Misuse (a value with no pending key inside
//! an object, unbalanced ends, overflowing the scope stack) is reported as
//! an [`EncodeError`] instead of producing malformed output.

/// Maximum nesting depth of generated payloads.
const MAX_DEPTH: usize = 16;

/// Errors produced by incorrect generator usage.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodeError {
    /// More than [`MAX_DEPTH`] nested scopes.
    #[error("payload nesting exceeds {MAX_DEPTH} levels")]
    TooDeep,

    /// `end_object`/`end_array` without a matching begin.
    #[error("unbalanced scope end")]
    Unbalanced,

    /// A value was written inside an object without a preceding key.
    #[error("value in object scope requires a preceding key")]
    KeyRequired,

    /// A key was written outside of an object scope.
    #[error("object member outside of object scope")]
    NotAnObject,
}

/// Convenience alias for generator results.
pub type Result<T> = std::result::Result<T, EncodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

/// An incremental JSON generator.
///
/// ```
/// use forge_json::JsonGen;
///
/// let mut r#gen = JsonGen::new();
/// r#gen.begin_object().unwrap();
/// r#gen.objmember("title").unwrap();
/// r#gen.string("hello").unwrap();
/// r#gen.end_object().unwrap();
/// assert_eq!(r#gen.to_string(), r#"{"title": "hello"}"#);
/// ```
#[derive(Debug, Default)]
pub struct JsonGen {
    buf: String,
    scopes: Vec<Scope>,
    first_elem: bool,
    await_object_value: bool,
}

impl JsonGen {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            scopes: Vec::new(),
            first_elem: true,
            await_object_value: false,
        }
    }

    /// Returns the accumulated payload.
    pub fn to_string(&self) -> String {
        self.buf.clone()
    }

    /// Consumes the generator, returning the payload without a copy.
    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.begin_scope(Scope::Object, '{')
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.end_scope(Scope::Object, '}')
    }

    pub fn begin_array(&mut self) -> Result<()> {
        self.begin_scope(Scope::Array, '[')
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.end_scope(Scope::Array, ']')
    }

    /// Writes `"key": ` and arms the generator to expect its value.
    pub fn objmember(&mut self, key: &str) -> Result<()> {
        if self.scopes.last() != Some(&Scope::Object) || self.await_object_value {
            return Err(EncodeError::NotAnObject);
        }
        self.separate();
        self.push_escaped(key);
        self.buf.push_str(": ");
        self.first_elem = false;
        self.await_object_value = true;
        Ok(())
    }

    pub fn string(&mut self, value: &str) -> Result<()> {
        self.value_position()?;
        self.push_escaped(value);
        Ok(())
    }

    pub fn number(&mut self, value: i64) -> Result<()> {
        self.value_position()?;
        self.buf.push_str(&value.to_string());
        Ok(())
    }

    pub fn id(&mut self, value: u64) -> Result<()> {
        self.value_position()?;
        self.buf.push_str(&value.to_string());
        Ok(())
    }

    pub fn boolean(&mut self, value: bool) -> Result<()> {
        self.value_position()?;
        self.buf.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    pub fn null(&mut self) -> Result<()> {
        self.value_position()?;
        self.buf.push_str("null");
        Ok(())
    }

    // -- Internals -----------------------------------------------------------

    fn begin_scope(&mut self, scope: Scope, open: char) -> Result<()> {
        // A container may be a whole payload, an array element, or the
        // value of a pending key; never a bare object member.
        if self.scopes.last() == Some(&Scope::Object) && !self.await_object_value {
            return Err(EncodeError::KeyRequired);
        }
        if self.scopes.len() >= MAX_DEPTH {
            return Err(EncodeError::TooDeep);
        }
        self.separate();
        self.buf.push(open);
        self.scopes.push(scope);
        self.first_elem = true;
        self.await_object_value = false;
        Ok(())
    }

    fn end_scope(&mut self, scope: Scope, close: char) -> Result<()> {
        if self.scopes.pop() != Some(scope) {
            return Err(EncodeError::Unbalanced);
        }
        self.buf.push(close);
        self.first_elem = false;
        self.await_object_value = false;
        Ok(())
    }

    fn value_position(&mut self) -> Result<()> {
        if self.scopes.last() == Some(&Scope::Object) && !self.await_object_value {
            return Err(EncodeError::KeyRequired);
        }
        self.separate();
        self.await_object_value = false;
        Ok(())
    }

    /// Emits the comma between siblings where one is due. No comma is
    /// due right after a key (the colon was just written) or before the
    /// first element of a scope.
    fn separate(&mut self) {
        if !self.await_object_value && !self.first_elem && !self.scopes.is_empty() {
            self.buf.push_str(", ");
        }
        self.first_elem = false;
    }

    fn push_escaped(&mut self, s: &str) {
        // serde_json produces the quoted, escape-correct form.
        self.buf.push_str(&serde_json::to_string(s).unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_with_number_member() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_object().unwrap();
        r#gen.objmember("number").unwrap();
        r#gen.number(420).unwrap();
        r#gen.end_object().unwrap();
        assert_eq!(r#gen.to_string(), r#"{"number": 420}"#);
    }

    #[test]
    fn commas_between_siblings() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_object().unwrap();
        r#gen.objmember("a").unwrap();
        r#gen.string("x").unwrap();
        r#gen.objmember("b").unwrap();
        r#gen.begin_array().unwrap();
        r#gen.number(1).unwrap();
        r#gen.number(2).unwrap();
        r#gen.end_array().unwrap();
        r#gen.objmember("c").unwrap();
        r#gen.boolean(true).unwrap();
        r#gen.end_object().unwrap();
        assert_eq!(r#gen.to_string(), r#"{"a": "x", "b": [1, 2], "c": true}"#);
    }

    #[test]
    fn strings_are_escaped() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_object().unwrap();
        r#gen.objmember("body").unwrap();
        r#gen.string("line\nwith \"quotes\" and \\slash\\").unwrap();
        r#gen.end_object().unwrap();
        assert_eq!(
            r#gen.to_string(),
            r#"{"body": "line\nwith \"quotes\" and \\slash\\"}"#
        );
    }

    #[test]
    fn null_member() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_object().unwrap();
        r#gen.objmember("milestone_id").unwrap();
        r#gen.null().unwrap();
        r#gen.end_object().unwrap();
        assert_eq!(r#gen.to_string(), r#"{"milestone_id": null}"#);
    }

    #[test]
    fn value_without_key_is_rejected() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_object().unwrap();
        assert_eq!(r#gen.string("oops"), Err(EncodeError::KeyRequired));
    }

    #[test]
    fn member_outside_object_is_rejected() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_array().unwrap();
        assert_eq!(r#gen.objmember("k"), Err(EncodeError::NotAnObject));
    }

    #[test]
    fn unbalanced_end_is_rejected() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_array().unwrap();
        assert_eq!(r#gen.end_object(), Err(EncodeError::Unbalanced));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut r#gen = JsonGen::new();
        for _ in 0..16 {
            r#gen.begin_array().unwrap();
        }
        assert_eq!(r#gen.begin_array(), Err(EncodeError::TooDeep));
    }

    #[test]
    fn generator_output_parses_back() {
        let mut r#gen = JsonGen::new();
        r#gen.begin_object().unwrap();
        r#gen.objmember("title").unwrap();
        r#gen.string("a \"tricky\"\ttitle").unwrap();
        r#gen.objmember("draft").unwrap();
        r#gen.boolean(false).unwrap();
        r#gen.objmember("labels").unwrap();
        r#gen.begin_array().unwrap();
        r#gen.string("bug").unwrap();
        r#gen.string("ci").unwrap();
        r#gen.end_array().unwrap();
        r#gen.objmember("assignee").unwrap();
        r#gen.null().unwrap();
        r#gen.end_object().unwrap();

        let payload = r#gen.into_string();
        let mut s = crate::decode::Stream::new(&payload);
        let mut title = String::new();
        let mut draft = true;
        let mut labels = Vec::new();
        let mut assignee = Some(String::new());
        s.object(|s, key| {
            match key {
                "title" => title = s.string()?,
                "draft" => draft = s.boolean()?,
                "labels" => labels = s.string_array()?,
                "assignee" => assignee = s.nullable_string()?,
                _ => s.skip_value()?,
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(title, "a \"tricky\"\ttitle");
        assert!(!draft);
        assert_eq!(labels, vec!["bug", "ci"]);
        assert_eq!(assignee, None);
    }
}
