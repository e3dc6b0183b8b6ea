//! `link:` response header parsing.

/// Extracts the `rel="next"` URL from a `link:` header value.
///
/// The header is a comma-separated list of `<url>; rel="name"` entries.
/// Returns `None` when no `next` relation is present.
pub fn parse_link_header(header: &str) -> Option<String> {
    for entry in header.split(',') {
        let entry = entry.trim();
        let Some((url_part, params)) = entry.split_once(';') else {
            continue;
        };
        let is_next = params
            .split(';')
            .any(|param| param.trim() == "rel=\"next\"");
        if is_next {
            let url = url_part
                .trim()
                .strip_prefix('<')
                .and_then(|u| u.strip_suffix('>'))
                .unwrap_or(url_part)
                .trim();
            return Some(url.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_next_relation() {
        let header = r#"<https://x/?page=2>; rel="next", <https://x/?page=7>; rel="last""#;
        assert_eq!(
            parse_link_header(header).as_deref(),
            Some("https://x/?page=2")
        );
    }

    #[test]
    fn next_not_first_entry() {
        let header = r#"<https://x/?page=1>; rel="prev", <https://x/?page=3>; rel="next""#;
        assert_eq!(
            parse_link_header(header).as_deref(),
            Some("https://x/?page=3")
        );
    }

    #[test]
    fn no_next_relation_yields_none() {
        let header = r#"<https://x/?page=7>; rel="last", <https://x/?page=1>; rel="first""#;
        assert_eq!(parse_link_header(header), None);
    }

    #[test]
    fn empty_header_yields_none() {
        assert_eq!(parse_link_header(""), None);
    }
}
