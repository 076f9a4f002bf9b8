//! Heading detection and anchor slugs.

use std::sync::LazyLock;

use regex::Regex;

use crate::blocks::BlockTracker;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Derive a URL-fragment slug from heading text.
///
/// HTML tags are removed and the text lowercased. Only ASCII word
/// characters, whitespace, Cyrillic letters and hyphens survive. Each
/// whitespace run becomes a single hyphen and hyphens at either end are
/// trimmed. Existing hyphen runs are not collapsed, so `a - b` yields
/// `a---b`.
///
/// # Examples
///
/// ```
/// use kb_renderer::anchor;
///
/// assert_eq!(anchor("Getting Started"), "getting-started");
/// assert_eq!(anchor("Что такое <code>DOM</code>?"), "что-такое-dom");
/// ```
#[must_use]
pub fn anchor(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, "");
    let lowered = without_tags.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
            continue;
        }
        if is_slug_char(c) {
            slug.push(c);
            in_space = false;
        }
    }

    slug.trim_matches('-').to_owned()
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || ('\u{0400}'..='\u{04FF}').contains(&c)
}

/// An ATX heading found by [`scan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
    pub(crate) level: u8,
    /// Heading text, trimmed, closing `#` run included.
    pub(crate) title: &'a str,
}

/// One source line (ending included) and the heading it holds, if any.
pub(crate) struct Line<'a> {
    pub(crate) text: &'a str,
    pub(crate) heading: Option<Heading<'a>>,
}

/// Walk the document line by line, recognizing `#`-headings that start at
/// column zero outside fenced code and raw HTML blocks.
pub(crate) fn scan(markdown: &str) -> impl Iterator<Item = Line<'_>> {
    let mut blocks = BlockTracker::new();
    markdown.split_inclusive('\n').map(move |text| {
        let heading = if blocks.consume(text) {
            None
        } else {
            parse_atx(text)
        };
        Line { text, heading }
    })
}

/// Parse a single line as an ATX heading: one to six `#`, whitespace, text.
pub(crate) fn parse_atx(line: &str) -> Option<Heading<'_>> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(|c: char| c.is_whitespace() && c != '\n' && c != '\r') {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some(Heading {
        level: u8::try_from(hashes).ok()?,
        title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings(markdown: &str) -> Vec<(u8, &str)> {
        scan(markdown)
            .filter_map(|line| line.heading)
            .map(|h| (h.level, h.title))
            .collect()
    }

    #[test]
    fn test_anchor_basic() {
        assert_eq!(anchor("Hello World"), "hello-world");
    }

    #[test]
    fn test_anchor_strips_punctuation() {
        assert_eq!(anchor("What's New?"), "whats-new");
        assert_eq!(anchor("C++ & Rust"), "c-rust");
    }

    #[test]
    fn test_anchor_keeps_underscore_and_hyphen() {
        assert_eq!(anchor("snake_case and kebab-case"), "snake_case-and-kebab-case");
    }

    #[test]
    fn test_anchor_does_not_collapse_hyphens() {
        assert_eq!(anchor("a - b"), "a---b");
    }

    #[test]
    fn test_anchor_cyrillic() {
        assert_eq!(anchor("Сетевые Технологии"), "сетевые-технологии");
    }

    #[test]
    fn test_anchor_strips_tags() {
        assert_eq!(anchor("Using <code>useEffect</code>"), "using-useeffect");
    }

    #[test]
    fn test_anchor_trims_edges() {
        assert_eq!(anchor("  -- Intro --  "), "intro");
        assert_eq!(anchor("???"), "");
    }

    #[test]
    fn test_anchor_idempotent() {
        for text in ["Hello World", "Что такое DOM?", "a - b", "x_y"] {
            let once = anchor(text);
            assert_eq!(anchor(&once), once);
        }
    }

    #[test]
    fn test_parse_atx_levels() {
        assert_eq!(parse_atx("# A").map(|h| h.level), Some(1));
        assert_eq!(parse_atx("###### F").map(|h| h.level), Some(6));
        assert_eq!(parse_atx("####### G"), None);
    }

    #[test]
    fn test_parse_atx_requires_space() {
        assert_eq!(parse_atx("#hashtag"), None);
        assert_eq!(parse_atx("#"), None);
        assert_eq!(parse_atx("#   \n"), None);
    }

    #[test]
    fn test_parse_atx_trims_title() {
        assert_eq!(parse_atx("##   Spaced   \r\n").map(|h| h.title), Some("Spaced"));
    }

    #[test]
    fn test_parse_atx_indented_is_not_heading() {
        assert_eq!(parse_atx(" # A"), None);
    }

    #[test]
    fn test_scan_skips_fenced_code() {
        let md = "# Real\n\n```bash\n# comment\n```\n\n## Also real\n";
        assert_eq!(headings(md), [(1, "Real"), (2, "Also real")]);
    }

    #[test]
    fn test_scan_skips_html_blocks() {
        let md = "<details>\n<summary>Ответ</summary>\n# Hidden\n</details>\n\n<!--\n# Draft\n-->\n## Shown\n";
        assert_eq!(headings(md), [(2, "Shown")]);
    }

    #[test]
    fn test_scan_after_indented_backticks() {
        let md = "Intro\n\n    ```\n\n## Next\n";
        assert_eq!(headings(md), [(2, "Next")]);
    }

    #[test]
    fn test_scan_preserves_line_text() {
        let text: String = scan("a\r\nb\n").map(|line| line.text).collect();
        assert_eq!(text, "a\r\nb\n");
    }
}
