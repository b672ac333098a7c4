//! Frontmatter parsing for content files.
//!
//! Frontmatter is a block of `key: value` lines delimited by `---` at
//! the very start of the file:
//!
//! ```markdown
//! ---
//! title: My Page
//! description: A description
//! ---
//!
//! Content starts here
//! ```
//!
//! Parsing never fails: input without a header block becomes a
//! frontmatter with an empty title and the whole input as body, and
//! malformed lines inside a block are skipped individually.

use std::collections::BTreeMap;

/// Metadata and body extracted from a content file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Page title; empty when absent.
    pub title: String,
    pub description: Option<String>,
    /// Publication date, kept as the raw string.
    pub date: Option<String>,
    /// Unrecognized keys, retained verbatim.
    pub extra: BTreeMap<String, String>,
    /// The content below the header block. Always present; falls back
    /// to the entire input when no header block is found.
    pub body: String,
}

/// Parse frontmatter from raw content.
pub fn parse_frontmatter(raw: &str) -> Frontmatter {
    let Some((header, body)) = split_header(raw) else {
        return Frontmatter {
            body: raw.to_string(),
            ..Frontmatter::default()
        };
    };

    let mut meta: BTreeMap<&str, String> = BTreeMap::new();
    for line in header.split('\n') {
        // The key is everything before the first colon; the value keeps
        // any further colons. Lines without both parts are skipped.
        if let Some((key, value)) = line.split_once(':') {
            if key.is_empty() {
                continue;
            }
            meta.insert(key.trim(), strip_wrapped_quotes(value).to_string());
        }
    }

    let mut frontmatter = Frontmatter {
        title: meta.remove("title").unwrap_or_default(),
        description: meta.remove("description"),
        date: meta.remove("date"),
        body: body.to_string(),
        ..Frontmatter::default()
    };
    frontmatter.extra = meta
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    frontmatter
}

/// Split input into (header block, body) when it opens with a
/// delimited header, mirroring `^---\n(...)\n---\n(...)$`.
fn split_header(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix("---\n")?;
    let close = rest.find("\n---\n")?;
    Some((&rest[..close], &rest[close + 5..]))
}

/// Strip one layer of symmetric wrapping quotes from a trimmed value,
/// but only when the value is at least two characters and both ends
/// match.
fn strip_wrapped_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        return &trimmed[1..trimmed.len() - 1];
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_frontmatter() {
        let parsed =
            parse_frontmatter("---\ntitle: Hello World\ndescription: A test post\n---\nBody content");
        assert_eq!(parsed.title, "Hello World");
        assert_eq!(parsed.description, Some("A test post".to_string()));
        assert_eq!(parsed.body, "Body content");
    }

    #[test]
    fn test_no_frontmatter_is_all_body() {
        let parsed = parse_frontmatter("Just body content without frontmatter");
        assert_eq!(parsed.title, "");
        assert_eq!(parsed.body, "Just body content without frontmatter");
    }

    #[test]
    fn test_unclosed_header_is_all_body() {
        let parsed = parse_frontmatter("---\ntitle: Dangling\nno closing delimiter");
        assert_eq!(parsed.title, "");
        assert!(parsed.body.starts_with("---\n"));
    }

    #[test]
    fn test_strips_both_quote_styles() {
        let parsed =
            parse_frontmatter("---\ntitle: \"Quoted Title\"\ndescription: 'Single quoted'\n---\nBody");
        assert_eq!(parsed.title, "Quoted Title");
        assert_eq!(parsed.description, Some("Single quoted".to_string()));
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        let parsed = parse_frontmatter("---\ntitle: \"half quoted\n---\nBody");
        assert_eq!(parsed.title, "\"half quoted");
    }

    #[test]
    fn test_value_keeps_further_colons() {
        let parsed = parse_frontmatter("---\ntitle: a: b: c\n---\nBody");
        assert_eq!(parsed.title, "a: b: c");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let parsed = parse_frontmatter("---\ntitle: Ok\nnot a pair\n: empty key\n---\nBody");
        assert_eq!(parsed.title, "Ok");
        assert!(parsed.extra.is_empty());
    }

    #[test]
    fn test_unrecognized_keys_are_retained() {
        let parsed = parse_frontmatter("---\ntitle: T\nauthor: Jo\ndate: 2024-01-02\n---\nBody");
        assert_eq!(parsed.date, Some("2024-01-02".to_string()));
        assert_eq!(parsed.extra.get("author"), Some(&"Jo".to_string()));
    }

    #[test]
    fn test_empty_body_after_header() {
        let parsed = parse_frontmatter("---\ntitle: T\n---\n");
        assert_eq!(parsed.title, "T");
        assert_eq!(parsed.body, "");
    }
}
