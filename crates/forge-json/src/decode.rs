//! Pull parser over a response buffer.
//!
//! [`Stream`] yields one [`Event`] per structural token. Object keys are
//! delivered as plain string events (the following event is the value),
//! which keeps the helper layer small: `object` drives key dispatch,
//! `skip_value` fast-forwards over anything, and the typed getters
//! consume exactly one value each.

use std::borrow::Cow;

/// Errors produced while decoding a response.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A token of one class appeared where another was required.
    #[error("expected {expected} at byte {offset}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
        offset: usize,
    },

    /// The buffer ended in the middle of a value.
    #[error("unexpected end of input at byte {0}")]
    Eof(usize),

    /// Malformed JSON.
    #[error("invalid JSON at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A mandatory field was missing from an object.
    #[error("missing field {0:?} in response object")]
    MissingField(&'static str),

    /// An `advance` format expectation was not met.
    #[error("expected {expected:?} at byte {offset}, found {found:?}")]
    AdvanceMismatch {
        expected: String,
        found: String,
        offset: usize,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// One structural token.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    /// A string value, or an object key (the next event is its value).
    Str(Cow<'a, str>),
    /// A number, kept as its raw text so integer getters stay exact.
    Num(&'a str),
    Bool(bool),
    Null,
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ObjectBegin => EventKind::ObjectBegin,
            Event::ObjectEnd => EventKind::ObjectEnd,
            Event::ArrayBegin => EventKind::ArrayBegin,
            Event::ArrayEnd => EventKind::ArrayEnd,
            Event::Str(_) => EventKind::Str,
            Event::Num(_) => EventKind::Num,
            Event::Bool(_) => EventKind::Bool,
            Event::Null => EventKind::Null,
        }
    }
}

/// Token class, for peeking without borrowing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    Str,
    Num,
    Bool,
    Null,
}

impl EventKind {
    fn name(self) -> &'static str {
        match self {
            Self::ObjectBegin => "object",
            Self::ObjectEnd => "end of object",
            Self::ArrayBegin => "array",
            Self::ArrayEnd => "end of array",
            Self::Str => "string",
            Self::Num => "number",
            Self::Bool => "boolean",
            Self::Null => "null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Inside an object, the next event is a key (or the closing brace).
    ObjectKey,
    /// Inside an object, the next event is the value for the last key.
    ObjectValue,
    Array,
}

/// A pull parser over a complete response buffer.
#[derive(Debug)]
pub struct Stream<'a> {
    src: &'a str,
    pos: usize,
    scopes: Vec<Scope>,
    /// Whether the next element in the current scope is the first one
    /// (no separating comma expected).
    first: bool,
    peeked: Option<Event<'a>>,
    /// Set once the single top-level value has been fully consumed.
    done: bool,
}

impl<'a> Stream<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            scopes: Vec::new(),
            first: true,
            peeked: None,
            done: false,
        }
    }

    /// Byte offset of the read cursor, for diagnostics.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the class of the next event without consuming it.
    pub fn peek_kind(&mut self) -> Result<EventKind> {
        if self.peeked.is_none() {
            let ev = self.advance_event()?;
            self.peeked = Some(ev);
        }
        Ok(self.peeked.as_ref().map(Event::kind).unwrap())
    }

    /// Consumes and returns the next event.
    pub fn next_event(&mut self) -> Result<Event<'a>> {
        if let Some(ev) = self.peeked.take() {
            return Ok(ev);
        }
        self.advance_event()
    }

    // -- Typed getters -------------------------------------------------------

    /// Consumes a number (or null, which yields 0).
    pub fn int(&mut self) -> Result<i64> {
        let offset = self.pos;
        match self.next_event()? {
            Event::Num(raw) => parse_int(raw, offset),
            Event::Null => Ok(0),
            other => Err(self.unexpected("number", &other, offset)),
        }
    }

    /// Consumes a non-negative number (or null, which yields 0).
    pub fn uint(&mut self) -> Result<u64> {
        let offset = self.pos;
        let value = self.int()?;
        u64::try_from(value).map_err(|_| DecodeError::Syntax {
            offset,
            message: format!("expected non-negative integer, got {value}"),
        })
    }

    /// Consumes a number (or null, which yields 0.0).
    pub fn double(&mut self) -> Result<f64> {
        let offset = self.pos;
        match self.next_event()? {
            Event::Num(raw) => raw.parse::<f64>().map_err(|_| DecodeError::Syntax {
                offset,
                message: format!("malformed number {raw:?}"),
            }),
            Event::Null => Ok(0.0),
            other => Err(self.unexpected("number", &other, offset)),
        }
    }

    /// Consumes a boolean (or null, which yields false).
    pub fn boolean(&mut self) -> Result<bool> {
        let offset = self.pos;
        match self.next_event()? {
            Event::Bool(b) => Ok(b),
            Event::Null => Ok(false),
            other => Err(self.unexpected("boolean", &other, offset)),
        }
    }

    /// Consumes a string. A null here is a decode error; use
    /// [`Stream::nullable_string`] for fields the API may null out.
    pub fn string(&mut self) -> Result<String> {
        let offset = self.pos;
        match self.next_event()? {
            Event::Str(s) => Ok(s.into_owned()),
            other => Err(self.unexpected("string", &other, offset)),
        }
    }

    /// Consumes a string or null.
    pub fn nullable_string(&mut self) -> Result<Option<String>> {
        let offset = self.pos;
        match self.next_event()? {
            Event::Str(s) => Ok(Some(s.into_owned())),
            Event::Null => Ok(None),
            other => Err(self.unexpected("string or null", &other, offset)),
        }
    }

    /// Consumes a number and renders it as a decimal string. Some
    /// backends identify entities numerically where others use strings.
    pub fn int_to_string(&mut self) -> Result<String> {
        Ok(self.int()?.to_string())
    }

    /// Consumes a user object, returning the value of `user_key`
    /// (`"login"` on GitHub, `"username"` on GitLab/Gitea).
    pub fn user(&mut self, user_key: &str) -> Result<String> {
        let mut name = None;
        self.object(|s, key| {
            if key == user_key {
                name = Some(s.string()?);
            } else {
                s.skip_value()?;
            }
            Ok(())
        })?;
        name.ok_or(DecodeError::MissingField("user name"))
    }

    /// Consumes a label object, returning its `"name"` field.
    pub fn label_name(&mut self) -> Result<String> {
        let mut name = None;
        self.object(|s, key| {
            if key == "name" {
                name = Some(s.string()?);
            } else {
                s.skip_value()?;
            }
            Ok(())
        })?;
        name.ok_or(DecodeError::MissingField("name"))
    }

    // -- Structural helpers --------------------------------------------------

    /// Consumes an entire object, invoking `f` once per key. `f` must
    /// consume the value (typed getter or [`Stream::skip_value`]).
    pub fn object<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Stream<'a>, &str) -> Result<()>,
    {
        self.expect(EventKind::ObjectBegin)?;
        loop {
            if self.peek_kind()? == EventKind::ObjectEnd {
                self.next_event()?;
                return Ok(());
            }
            let offset = self.pos;
            let key = match self.next_event()? {
                Event::Str(k) => k.into_owned(),
                other => return Err(self.unexpected("object key", &other, offset)),
            };
            f(self, &key)?;
        }
    }

    /// Consumes an entire array, invoking `f` once per element. `f` must
    /// consume the element.
    pub fn array<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Stream<'a>) -> Result<()>,
    {
        self.expect(EventKind::ArrayBegin)?;
        loop {
            if self.peek_kind()? == EventKind::ArrayEnd {
                self.next_event()?;
                return Ok(());
            }
            f(self)?;
        }
    }

    /// Consumes an array of strings.
    pub fn string_array(&mut self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        self.array(|s| {
            out.push(s.string()?);
            Ok(())
        })?;
        Ok(out)
    }

    /// Fast-forwards over the next value, whatever its type.
    pub fn skip_value(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let offset = self.pos;
            match self.next_event()? {
                Event::ObjectBegin | Event::ArrayBegin => depth += 1,
                ev @ (Event::ObjectEnd | Event::ArrayEnd) => {
                    if depth == 0 {
                        // A closing token is not a value.
                        return Err(self.unexpected("value", &ev, offset));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Requires the next event to be of the given class.
    pub fn expect(&mut self, kind: EventKind) -> Result<()> {
        let offset = self.pos;
        let ev = self.next_event()?;
        if ev.kind() == kind {
            Ok(())
        } else {
            Err(self.unexpected(kind.name(), &ev, offset))
        }
    }

    /// Navigates nested structure with a mini format language:
    /// `{`/`}` open/close an object, `[`/`]` open/close an array,
    /// `s` consumes a string that must equal the next entry of `args`
    /// (typically an object key), `i` consumes an integer. Whitespace in
    /// `fmt` is ignored.
    pub fn advance(&mut self, fmt: &str, args: &[&str]) -> Result<()> {
        let mut args = args.iter();
        for ch in fmt.chars() {
            match ch {
                '{' => self.expect(EventKind::ObjectBegin)?,
                '}' => self.expect(EventKind::ObjectEnd)?,
                '[' => self.expect(EventKind::ArrayBegin)?,
                ']' => self.expect(EventKind::ArrayEnd)?,
                's' => {
                    let want = args.next().ok_or_else(|| DecodeError::Syntax {
                        offset: self.pos,
                        message: "advance: more `s` directives than arguments".into(),
                    })?;
                    let offset = self.pos;
                    let got = self.string()?;
                    if got != *want {
                        return Err(DecodeError::AdvanceMismatch {
                            expected: (*want).to_string(),
                            found: got,
                            offset,
                        });
                    }
                }
                'i' => {
                    self.int()?;
                }
                c if c.is_whitespace() => {}
                c => {
                    return Err(DecodeError::Syntax {
                        offset: self.pos,
                        message: format!("advance: unknown directive {c:?}"),
                    });
                }
            }
        }
        Ok(())
    }

    // -- Tokenizer -----------------------------------------------------------

    fn unexpected(&self, expected: &'static str, found: &Event<'_>, offset: usize) -> DecodeError {
        DecodeError::Unexpected {
            expected,
            found: found.kind().name(),
            offset,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn skip_ws(&mut self) {
        while let Some(&b) = self.bytes().get(self.pos) {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes().get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Produces the next event, handling separators according to the
    /// current scope.
    fn advance_event(&mut self) -> Result<Event<'a>> {
        self.skip_ws();

        match self.scopes.last().copied() {
            None => {
                if self.done {
                    return Err(DecodeError::Eof(self.pos));
                }
                let ev = self.value_start()?;
                if self.scopes.is_empty() {
                    self.done = true;
                }
                Ok(ev)
            }
            Some(Scope::Array) => {
                if !self.first {
                    if self.eat(b',') {
                        self.skip_ws();
                    } else if self.bytes().get(self.pos) != Some(&b']') {
                        return Err(DecodeError::Syntax {
                            offset: self.pos,
                            message: "expected `,` or `]`".into(),
                        });
                    }
                }
                if self.eat(b']') {
                    self.pop_scope();
                    return Ok(Event::ArrayEnd);
                }
                self.first = false;
                self.value_start()
            }
            Some(Scope::ObjectKey) => {
                if !self.first {
                    if self.eat(b',') {
                        self.skip_ws();
                    } else if self.bytes().get(self.pos) != Some(&b'}') {
                        return Err(DecodeError::Syntax {
                            offset: self.pos,
                            message: "expected `,` or `}`".into(),
                        });
                    }
                }
                if self.eat(b'}') {
                    self.pop_scope();
                    return Ok(Event::ObjectEnd);
                }
                self.first = false;
                let key = self.lex_string()?;
                self.skip_ws();
                if !self.eat(b':') {
                    return Err(DecodeError::Syntax {
                        offset: self.pos,
                        message: "expected `:` after object key".into(),
                    });
                }
                *self.scopes.last_mut().unwrap() = Scope::ObjectValue;
                Ok(Event::Str(key))
            }
            Some(Scope::ObjectValue) => {
                *self.scopes.last_mut().unwrap() = Scope::ObjectKey;
                self.value_start()
            }
        }
    }

    /// Parses the start of a value: a scalar, or the opening of a
    /// container (which pushes a scope).
    fn value_start(&mut self) -> Result<Event<'a>> {
        self.skip_ws();
        let Some(&b) = self.bytes().get(self.pos) else {
            return Err(DecodeError::Eof(self.pos));
        };

        match b {
            b'{' => {
                self.pos += 1;
                self.scopes.push(Scope::ObjectKey);
                self.first = true;
                Ok(Event::ObjectBegin)
            }
            b'[' => {
                self.pos += 1;
                self.scopes.push(Scope::Array);
                self.first = true;
                Ok(Event::ArrayBegin)
            }
            b'"' => Ok(Event::Str(self.lex_string()?)),
            b't' => {
                self.lex_literal("true")?;
                Ok(Event::Bool(true))
            }
            b'f' => {
                self.lex_literal("false")?;
                Ok(Event::Bool(false))
            }
            b'n' => {
                self.lex_literal("null")?;
                Ok(Event::Null)
            }
            b'-' | b'0'..=b'9' => Ok(Event::Num(self.lex_number()?)),
            _ => Err(DecodeError::Syntax {
                offset: self.pos,
                message: format!("unexpected byte {:?}", b as char),
            }),
        }
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
        self.first = false;
        if self.scopes.is_empty() {
            self.done = true;
        }
    }

    /// Lexes a quoted string. Unescaping is delegated to serde_json;
    /// strings without escapes are borrowed from the buffer.
    fn lex_string(&mut self) -> Result<Cow<'a, str>> {
        self.skip_ws();
        let start = self.pos;
        if !self.eat(b'"') {
            return Err(DecodeError::Syntax {
                offset: self.pos,
                message: "expected string".into(),
            });
        }
        let mut escaped = false;
        loop {
            let Some(&b) = self.bytes().get(self.pos) else {
                return Err(DecodeError::Eof(self.pos));
            };
            self.pos += 1;
            match b {
                b'"' => break,
                b'\\' => {
                    escaped = true;
                    // Consume the escaped byte so `\"` does not end the
                    // string; longer escapes are validated by serde_json.
                    if self.bytes().get(self.pos).is_some() {
                        self.pos += 1;
                    }
                }
                _ => {}
            }
        }
        let quoted = &self.src[start..self.pos];
        if escaped {
            let unescaped: String =
                serde_json::from_str(quoted).map_err(|e| DecodeError::Syntax {
                    offset: start,
                    message: format!("bad string escape: {e}"),
                })?;
            Ok(Cow::Owned(unescaped))
        } else {
            Ok(Cow::Borrowed(&quoted[1..quoted.len() - 1]))
        }
    }

    fn lex_literal(&mut self, lit: &'static str) -> Result<()> {
        if self.src[self.pos..].starts_with(lit) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(DecodeError::Syntax {
                offset: self.pos,
                message: format!("expected {lit:?}"),
            })
        }
    }

    fn lex_number(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while let Some(&b) = self.bytes().get(self.pos) {
            match b {
                b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E' => self.pos += 1,
                _ => break,
            }
        }
        let raw = &self.src[start..self.pos];
        // Shape check now so getters can cast without re-validating.
        if raw.parse::<f64>().is_err() {
            return Err(DecodeError::Syntax {
                offset: start,
                message: format!("malformed number {raw:?}"),
            });
        }
        Ok(raw)
    }
}

fn parse_int(raw: &str, offset: usize) -> Result<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    // Fractional or exponent form; fall back through f64.
    raw.parse::<f64>()
        .map(|f| f as i64)
        .map_err(|_| DecodeError::Syntax {
            offset,
            message: format!("malformed number {raw:?}"),
        })
}

// ---------------------------------------------------------------------------
// Colour parsing
// ---------------------------------------------------------------------------

/// Parses a GitHub-style colour (`"d73a4a"`) into `0xRRGGBB00`.
pub fn github_color(stream: &mut Stream<'_>) -> Result<u32> {
    let offset = stream.offset();
    let raw = stream.string()?;
    color_from_hex(&raw, offset)
}

/// Parses a GitLab-style colour (`"#d73a4a"`) into `0xRRGGBB00`.
pub fn gitlab_color(stream: &mut Stream<'_>) -> Result<u32> {
    let offset = stream.offset();
    let raw = stream.string()?;
    color_from_hex(raw.strip_prefix('#').unwrap_or(&raw), offset)
}

fn color_from_hex(hex: &str, offset: usize) -> Result<u32> {
    u32::from_str_radix(hex, 16)
        .map(|rgb| rgb << 8)
        .map_err(|_| DecodeError::Syntax {
            offset,
            message: format!("malformed colour {hex:?}"),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalar_events() {
        let mut s = Stream::new(r#"[1, "two", true, null, -3.5]"#);
        assert_eq!(s.next_event().unwrap(), Event::ArrayBegin);
        assert_eq!(s.int().unwrap(), 1);
        assert_eq!(s.string().unwrap(), "two");
        assert!(s.boolean().unwrap());
        assert_eq!(s.next_event().unwrap(), Event::Null);
        assert_eq!(s.double().unwrap(), -3.5);
        assert_eq!(s.next_event().unwrap(), Event::ArrayEnd);
        assert!(s.next_event().is_err());
    }

    #[test]
    fn null_scalars_decay_to_zero() {
        let mut s = Stream::new("[null, null, null]");
        s.expect(EventKind::ArrayBegin).unwrap();
        assert_eq!(s.int().unwrap(), 0);
        assert_eq!(s.double().unwrap(), 0.0);
        assert!(!s.boolean().unwrap());
    }

    #[test]
    fn null_string_is_an_error() {
        let mut s = Stream::new("null");
        assert!(s.string().is_err());
        let mut s = Stream::new("null");
        assert_eq!(s.nullable_string().unwrap(), None);
    }

    #[test]
    fn object_iteration() {
        let mut title = String::new();
        let mut number = 0;
        let mut s = Stream::new(r#"{"number": 115, "title": "t", "junk": {"a": [1,2]}}"#);
        s.object(|s, key| {
            match key {
                "number" => number = s.uint().unwrap(),
                "title" => title = s.string()?,
                _ => s.skip_value()?,
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(number, 115);
        assert_eq!(title, "t");
    }

    #[test]
    fn skip_value_over_nesting() {
        let mut s = Stream::new(r#"[{"a": [[1], {"b": 2}]}, 7]"#);
        s.expect(EventKind::ArrayBegin).unwrap();
        s.skip_value().unwrap();
        assert_eq!(s.int().unwrap(), 7);
        s.expect(EventKind::ArrayEnd).unwrap();
    }

    #[test]
    fn string_unescaping() {
        let mut s = Stream::new(r#""a\nb \"c\" é""#);
        assert_eq!(s.string().unwrap(), "a\nb \"c\" \u{e9}");
    }

    #[test]
    fn user_extracts_backend_key() {
        let mut s = Stream::new(r#"{"id": 1, "login": "herrhotzenplotz", "site_admin": false}"#);
        assert_eq!(s.user("login").unwrap(), "herrhotzenplotz");

        let mut s = Stream::new(r#"{"username": "alice", "state": "active"}"#);
        assert_eq!(s.user("username").unwrap(), "alice");
    }

    #[test]
    fn label_name_discards_rest() {
        let mut s = Stream::new(r#"{"id": 9, "name": "bug", "color": "d73a4a"}"#);
        assert_eq!(s.label_name().unwrap(), "bug");
    }

    #[test]
    fn advance_mini_language() {
        let mut s = Stream::new(r#"{"data": {"items": [1, 2]}}"#);
        s.advance("{s{s[", &["data", "items"]).unwrap();
        assert_eq!(s.int().unwrap(), 1);
        assert_eq!(s.int().unwrap(), 2);
        s.advance("]}}", &[]).unwrap();
    }

    #[test]
    fn advance_reports_mismatch() {
        let mut s = Stream::new(r#"{"other": 1}"#);
        let err = s.advance("{s", &["data"]).unwrap_err();
        assert!(matches!(err, DecodeError::AdvanceMismatch { .. }));
    }

    #[test]
    fn colors_normalize_identically() {
        let mut github = Stream::new(r#""FF0000""#);
        let mut gitlab = Stream::new(r##""#FF0000""##);
        assert_eq!(github_color(&mut github).unwrap(), 0xFF000000);
        assert_eq!(gitlab_color(&mut gitlab).unwrap(), 0xFF000000);
    }

    #[test]
    fn github_label_color_sample() {
        let mut s = Stream::new(r#""d73a4a""#);
        assert_eq!(github_color(&mut s).unwrap(), 0xd73a4a00);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut s = Stream::new("{} {}");
        s.skip_value().unwrap();
        assert!(s.next_event().is_err());
    }
}
