//! Markdown rendering for KB articles.
//!
//! Turns article markdown into the two artifacts the UI needs: HTML with
//! anchored headings and labelled code blocks, and a table of contents whose
//! anchors match the rendered heading ids.
//!
//! Headings are recognized the same way for both outputs: `#`-prefixed lines
//! starting at column zero, outside fenced code and raw HTML blocks. Setext headings and
//! headings nested in lists or blockquotes still render, but get no id and no
//! TOC entry.
//!
//! # Example
//!
//! ```
//! use kb_renderer::render_article;
//!
//! let rendered = render_article("# Flexbox\n\n## Axes\n\nMain and cross.");
//! assert!(!rendered.html.contains("<h1"));
//! assert!(rendered.html.contains(r#"<h2 id="axes">Axes</h2>"#));
//! assert_eq!(rendered.toc[0].anchor, "axes");
//! ```

mod blocks;
mod fence;
mod frontmatter;
mod headings;
mod html;
mod html_block;
mod toc;

use serde::Serialize;

pub use frontmatter::{Frontmatter, FrontmatterError, ParsedDocument, UNTITLED, parse_document};
pub use headings::anchor;
pub use html::{code_block_html, escape_html, markdown_to_html};
pub use toc::{TocItem, extract_toc};

/// HTML and table of contents for one article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedArticle {
    pub html: String,
    pub toc: Vec<TocItem>,
}

/// Render an article body.
///
/// The leading H1 is dropped first since the page shows the title
/// separately; TOC and HTML are then produced from the same text.
#[must_use]
pub fn render_article(markdown: &str) -> RenderedArticle {
    let body = strip_leading_h1(markdown);
    let toc = extract_toc(body);
    let html = markdown_to_html(body);
    tracing::debug!(headings = toc.len(), bytes = html.len(), "Rendered article");
    RenderedArticle { html, toc }
}

/// Remove the first level-1 heading when it is the first non-blank line.
///
/// Leading blank lines and trailing whitespace are trimmed either way.
#[must_use]
pub fn strip_leading_h1(markdown: &str) -> &str {
    let body = skip_blank_lines(markdown);
    let first_line = body.split_inclusive('\n').next().unwrap_or("");
    let is_h1 = headings::parse_atx(first_line).is_some_and(|h| h.level == 1);

    let rest = if is_h1 {
        skip_blank_lines(&body[first_line.len()..])
    } else {
        body
    };
    rest.trim_end()
}

fn skip_blank_lines(s: &str) -> &str {
    let mut offset = 0;
    for line in s.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }
    &s[offset..]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_leading_h1() {
        assert_eq!(strip_leading_h1("# Title\n\nBody text"), "Body text");
    }

    #[test]
    fn test_strip_leading_h1_after_blank_lines() {
        assert_eq!(strip_leading_h1("\n\n# Title\nBody\n\n"), "Body");
    }

    #[test]
    fn test_strip_leading_h1_keeps_h2() {
        assert_eq!(strip_leading_h1("## Section\ntext"), "## Section\ntext");
    }

    #[test]
    fn test_strip_leading_h1_only_when_first() {
        let md = "Intro\n\n# Later\n";
        assert_eq!(strip_leading_h1(md), "Intro\n\n# Later");
    }

    #[test]
    fn test_strip_leading_h1_only_heading() {
        assert_eq!(strip_leading_h1("# Title"), "");
    }

    #[test]
    fn test_strip_leading_h1_keeps_indentation() {
        assert_eq!(strip_leading_h1("# T\n\n    code\n"), "    code");
    }

    #[test]
    fn test_render_article_drops_title() {
        let rendered = render_article("# Title\n\nBody text");
        assert!(!rendered.html.contains("Title"));
        assert!(rendered.html.contains("Body text"));
        assert!(rendered.toc.is_empty());
    }

    #[test]
    fn test_render_article_ids_match_toc() {
        let md = "# Hooks\n\n## useState\n\n### Правила хуков\n\n```js\n# not heading\n```\n\n## useState\n";
        let rendered = render_article(md);

        let anchors: Vec<&str> = rendered.toc.iter().map(|t| t.anchor.as_str()).collect();
        assert_eq!(anchors, ["usestate", "правила-хуков", "usestate"]);

        for item in &rendered.toc {
            let tag = format!(r#"<h{} id="{}">"#, item.level, item.anchor);
            assert!(rendered.html.contains(&tag), "missing {tag} in {}", rendered.html);
        }
    }

    #[test]
    fn test_render_article_heading_in_html_block() {
        let rendered = render_article("<details>\n<summary>Ответ</summary>\n# Hidden\n</details>\n\n## Visible\n");
        assert!(!rendered.html.contains("{#"), "{}", rendered.html);
        assert!(rendered.html.contains("# Hidden\n</details>"));
        let anchors: Vec<&str> = rendered.toc.iter().map(|t| t.anchor.as_str()).collect();
        assert_eq!(anchors, ["visible"]);
    }

    #[test]
    fn test_render_article_heading_in_comment() {
        let rendered = render_article("## Intro\n\n<!-- hidden\n## Draft section\n-->\n");
        assert!(rendered.html.contains("<!-- hidden\n## Draft section\n-->"), "{}", rendered.html);
        assert_eq!(rendered.toc.len(), 1);
        assert_eq!(rendered.toc[0].anchor, "intro");
    }

    #[test]
    fn test_render_article_indented_backticks_do_not_hide_headings() {
        let rendered = render_article("Intro\n\n    ```\n\n## Setup\n");
        assert!(rendered.html.contains(r#"<h2 id="setup">Setup</h2>"#), "{}", rendered.html);
        assert_eq!(rendered.toc.len(), 1);
        assert_eq!(rendered.toc[0].anchor, "setup");
    }

    #[test]
    fn test_render_article_serializes() {
        let rendered = render_article("## A");
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["toc"][0]["id"], "heading-1");
        assert_eq!(json["html"], "<h2 id=\"a\">A</h2>\n");
    }
}
