//! Raw HTML block detection for line-oriented scans.
//!
//! Follows the seven CommonMark HTML block kinds. Markdown inside such a
//! block is passed through as raw HTML, so a `#` line there is not a heading.

use std::sync::LazyLock;

use regex::Regex;

/// Tags whose content runs until the matching closing tag (kind 1).
const RAW_TEXT_TAGS: [&str; 4] = ["pre", "script", "style", "textarea"];
const RAW_TEXT_END: &[&str] = &["</pre>", "</script>", "</style>", "</textarea>"];

/// Block-level tags that open a block ending at a blank line (kind 6).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

/// A complete open or closing tag alone on its line (kind 7).
static TAG_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:<([A-Za-z][A-Za-z0-9-]*)(?:\s+[A-Za-z_:][A-Za-z0-9_.:-]*(?:\s*=\s*(?:[^\s"'=<>`]+|'[^']*'|"[^"]*"))?)*\s*/?>|</([A-Za-z][A-Za-z0-9-]*)\s*>)\s*$"#,
    )
    .unwrap()
});

/// How an open block ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockEnd {
    /// First line containing one of these, compared case-insensitively.
    Marker(&'static [&'static str]),
    /// First blank line, which is not part of the block.
    BlankLine,
}

/// Follows raw HTML blocks while a document is read line by line.
#[derive(Debug, Default)]
pub(crate) struct HtmlBlockTracker {
    open: Option<BlockEnd>,
}

impl HtmlBlockTracker {
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed a line while a block is open.
    ///
    /// Returns `true` when the line belongs to the block. A blank line that
    /// ends a blank-line block returns `false`.
    pub(crate) fn continue_block(&mut self, line: &str) -> bool {
        match self.open {
            Some(BlockEnd::Marker(markers)) => {
                if contains_any(line, markers) {
                    self.open = None;
                }
                true
            }
            Some(BlockEnd::BlankLine) => {
                if line.trim().is_empty() {
                    self.open = None;
                    false
                } else {
                    true
                }
            }
            None => false,
        }
    }

    /// Check whether `line` opens a block and enter it if so.
    ///
    /// `line` must already be relative to its container. Only a
    /// standalone-tag block (kind 7) cannot interrupt a paragraph.
    pub(crate) fn try_open(&mut self, line: &str, after_paragraph: bool) -> bool {
        if crate::fence::leading_columns(line) > 3 {
            return false;
        }
        let rest = line.trim_start();
        let Some((end, start_len)) = block_start(rest, after_paragraph) else {
            return false;
        };
        self.open = match end {
            BlockEnd::Marker(markers) if contains_any(&rest[start_len..], markers) => None,
            end => Some(end),
        };
        true
    }
}

fn block_start(rest: &str, after_paragraph: bool) -> Option<(BlockEnd, usize)> {
    if !rest.starts_with('<') {
        return None;
    }
    let lower = rest.to_ascii_lowercase();

    for tag in RAW_TEXT_TAGS {
        if lower[1..].starts_with(tag) && ends_tag_name(&lower[1 + tag.len()..], false) {
            return Some((BlockEnd::Marker(RAW_TEXT_END), 1 + tag.len()));
        }
    }
    if rest.starts_with("<!--") {
        return Some((BlockEnd::Marker(&["-->"]), 4));
    }
    if rest.starts_with("<?") {
        return Some((BlockEnd::Marker(&["?>"]), 2));
    }
    if rest.starts_with("<![CDATA[") {
        return Some((BlockEnd::Marker(&["]]>"]), 9));
    }
    if rest[1..].starts_with('!') && rest[2..].starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Some((BlockEnd::Marker(&[">"]), 2));
    }

    let name_start = if lower[1..].starts_with('/') { 2 } else { 1 };
    let name_len = lower[name_start..]
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    let name = &lower[name_start..name_start + name_len];
    if BLOCK_TAGS.contains(&name) && ends_tag_name(&lower[name_start + name_len..], true) {
        return Some((BlockEnd::BlankLine, 0));
    }

    if !after_paragraph && let Some(caps) = TAG_LINE_RE.captures(rest) {
        let tag = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_ascii_lowercase());
        if tag.is_some_and(|t| !RAW_TEXT_TAGS.contains(&t.as_str())) {
            return Some((BlockEnd::BlankLine, 0));
        }
    }
    None
}

/// Whether a tag name may end where `after` begins.
fn ends_tag_name(after: &str, allow_self_closing: bool) -> bool {
    after.is_empty()
        || after.starts_with(|c: char| c.is_whitespace() || c == '>')
        || (allow_self_closing && after.starts_with("/>"))
}

fn contains_any(line: &str, markers: &[&str]) -> bool {
    let lower = line.to_ascii_lowercase();
    markers.iter().any(|m| lower.contains(m))
}
