//! Table of contents extraction.

use serde::Serialize;

use crate::headings::{anchor, scan};

/// One heading in a document's table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocItem {
    /// Positional id, `heading-1` for the first heading.
    pub id: String,
    /// Heading text as written.
    pub title: String,
    /// Heading level (1-6).
    pub level: u8,
    /// Fragment id of the rendered heading. Not deduplicated.
    pub anchor: String,
}

/// Collect every `#`-heading outside code and raw HTML blocks, in document order.
///
/// Repeated titles produce repeated anchors; only `id` is unique.
#[must_use]
pub fn extract_toc(markdown: &str) -> Vec<TocItem> {
    scan(markdown)
        .filter_map(|line| line.heading)
        .enumerate()
        .map(|(i, heading)| TocItem {
            id: format!("heading-{}", i + 1),
            title: heading.title.to_owned(),
            level: heading.level,
            anchor: anchor(heading.title),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_toc_duplicate_titles() {
        let toc = extract_toc("# A\n## B\n## B");

        let levels: Vec<u8> = toc.iter().map(|t| t.level).collect();
        let anchors: Vec<&str> = toc.iter().map(|t| t.anchor.as_str()).collect();
        let ids: Vec<&str> = toc.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(levels, [1, 2, 2]);
        assert_eq!(anchors, ["a", "b", "b"]);
        assert_eq!(ids, ["heading-1", "heading-2", "heading-3"]);
    }

    #[test]
    fn test_extract_toc_keeps_literal_title() {
        let toc = extract_toc("## Hooks: `useState`\n");
        assert_eq!(
            toc,
            vec![TocItem {
                id: "heading-1".to_owned(),
                title: "Hooks: `useState`".to_owned(),
                level: 2,
                anchor: "hooks-usestate".to_owned(),
            }]
        );
    }

    #[test]
    fn test_extract_toc_ignores_code_blocks() {
        let toc = extract_toc("```sh\n# install\nnpm i\n```\n### Usage\n");
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "Usage");
        assert_eq!(toc[0].id, "heading-1");
    }

    #[test]
    fn test_extract_toc_empty() {
        assert!(extract_toc("Just a paragraph.").is_empty());
    }

    #[test]
    fn test_toc_item_serializes() {
        let item = TocItem {
            id: "heading-1".to_owned(),
            title: "A".to_owned(),
            level: 1,
            anchor: "a".to_owned(),
        };
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"id":"heading-1","title":"A","level":1,"anchor":"a"}"#
        );
    }
}
