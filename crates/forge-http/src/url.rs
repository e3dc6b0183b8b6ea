//! Percent-encoding of URL path and query components.

use crate::error::{HttpError, Result};

/// Returns `true` for bytes that travel unencoded.
fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Percent-encodes everything outside the unreserved set.
pub fn urlencode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Reverses [`urlencode`]. Fails on truncated or non-hex escapes and on
/// byte sequences that do not form valid UTF-8.
pub fn urldecode(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| HttpError::UrlDecode(input.to_string()))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| HttpError::UrlDecode(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unreserved_passes_through() {
        assert_eq!(urlencode("abc-DEF_0.9~"), "abc-DEF_0.9~");
    }

    #[test]
    fn reserved_is_escaped() {
        assert_eq!(urlencode("owner/repo"), "owner%2Frepo");
        assert_eq!(urlencode("a b&c"), "a%20b%26c");
    }

    #[test]
    fn decode_reverses_encode() {
        for input in ["", "plain", "owner/repo", "ünïcödé", "100% sure?&=#"] {
            assert_eq!(urldecode(&urlencode(input)).unwrap(), input);
        }
    }

    #[test]
    fn decode_rejects_bad_escapes() {
        assert!(urldecode("%").is_err());
        assert!(urldecode("%2").is_err());
        assert!(urldecode("%zz").is_err());
    }
}
