//! YAML frontmatter and document title extraction.
//!
//! A document may open with a YAML block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Flexbox
//! tags: [css, layout]
//! ---
//! # Flexbox
//! ...
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::headings::scan;

/// Title used when neither a heading nor frontmatter provides one.
pub const UNTITLED: &str = "Untitled";

/// Parsed frontmatter fields.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Frontmatter {
    /// Explicit title. Scalars other than strings are converted to text.
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: Option<String>,
    /// Any other keys, preserved as YAML values.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A markdown document split into frontmatter and body.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedDocument {
    /// First level-1 heading, else frontmatter title, else [`UNTITLED`].
    pub title: String,
    /// Markdown body with the frontmatter block removed.
    pub content: String,
    pub frontmatter: Frontmatter,
}

/// Error type for frontmatter parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// The frontmatter block is not valid YAML or not a mapping.
    #[error("Invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a document into frontmatter and body and determine its title.
///
/// Without a well-formed `---` block the whole input is the body.
///
/// # Errors
///
/// Returns [`FrontmatterError::Yaml`] if the frontmatter block is malformed.
pub fn parse_document(source: &str) -> Result<ParsedDocument, FrontmatterError> {
    let (frontmatter, body) = match split_frontmatter(source) {
        Some((yaml, body)) => (parse_yaml(yaml)?, body),
        None => (Frontmatter::default(), source),
    };

    let title = first_h1(body)
        .or_else(|| frontmatter.title.clone())
        .unwrap_or_else(|| UNTITLED.to_owned());

    Ok(ParsedDocument {
        title,
        content: body.to_owned(),
        frontmatter,
    })
}

fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok(Frontmatter::default());
    }
    Ok(serde_yaml::from_str(trimmed)?)
}

/// Return `(yaml, body)` when the source starts with a closed `---` block.
fn split_frontmatter(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let after_open = source.strip_prefix("---")?;
    let rest = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn first_h1(body: &str) -> Option<String> {
    scan(body)
        .filter_map(|line| line.heading)
        .find(|heading| heading.level == 1)
        .map(|heading| heading.title.to_owned())
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde_yaml::Value;

    let text = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    };
    Ok(text.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_title_from_h1() {
        let doc = parse_document("# Flexbox\n\nBody").unwrap();
        assert_eq!(doc.title, "Flexbox");
        assert_eq!(doc.content, "# Flexbox\n\nBody");
        assert_eq!(doc.frontmatter, Frontmatter::default());
    }

    #[test]
    fn test_h1_wins_over_frontmatter_title() {
        let doc = parse_document("---\ntitle: From YAML\n---\n# From Heading\n").unwrap();
        assert_eq!(doc.title, "From Heading");
        assert_eq!(doc.frontmatter.title.as_deref(), Some("From YAML"));
        assert_eq!(doc.content, "# From Heading\n");
    }

    #[test]
    fn test_frontmatter_title_fallback() {
        let doc = parse_document("---\ntitle: Grid\n---\n## Only h2\n").unwrap();
        assert_eq!(doc.title, "Grid");
    }

    #[test]
    fn test_untitled_fallback() {
        let doc = parse_document("Plain paragraph").unwrap();
        assert_eq!(doc.title, UNTITLED);
    }

    #[test]
    fn test_h1_inside_code_block_is_ignored() {
        let doc = parse_document("```md\n# Not the title\n```\n").unwrap();
        assert_eq!(doc.title, UNTITLED);
    }

    #[test]
    fn test_later_h1_is_used() {
        let doc = parse_document("Intro text\n\n## Part\n\n# Late Title\n").unwrap();
        assert_eq!(doc.title, "Late Title");
    }

    #[test]
    fn test_extra_keys_preserved() {
        let doc = parse_document("---\ntitle: X\ntags: [a, b]\n---\nbody").unwrap();
        let tags = doc.frontmatter.extra.get("tags").unwrap();
        assert_eq!(tags.as_sequence().map(Vec::len), Some(2));
        assert_eq!(doc.content, "body");
    }

    #[test]
    fn test_numeric_title_becomes_text() {
        let doc = parse_document("---\ntitle: 2024\n---\n").unwrap();
        assert_eq!(doc.title, "2024");
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let doc = parse_document("---\n---\n# T\n").unwrap();
        assert_eq!(doc.frontmatter, Frontmatter::default());
        assert_eq!(doc.content, "# T\n");
    }

    #[test]
    fn test_crlf_frontmatter() {
        let doc = parse_document("---\r\ntitle: Win\r\n---\r\nbody").unwrap();
        assert_eq!(doc.title, "Win");
        assert_eq!(doc.content, "body");
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let source = "---\ntitle: X\n# Heading\n";
        let doc = parse_document(source).unwrap();
        assert_eq!(doc.content, source);
        assert_eq!(doc.title, "Heading");
    }

    #[test]
    fn test_horizontal_rule_later_is_not_frontmatter() {
        let source = "Text\n---\nmore\n";
        assert_eq!(parse_document(source).unwrap().content, source);
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let err = parse_document("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml(_)));
        assert!(err.to_string().starts_with("Invalid frontmatter:"));
    }

    #[test]
    fn test_non_mapping_yaml_is_error() {
        assert!(parse_document("---\n- a\n- b\n---\nbody").is_err());
    }
}
