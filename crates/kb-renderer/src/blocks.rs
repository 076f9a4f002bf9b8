//! Literal block tracking for the heading scan.
//!
//! Combines fenced code, raw HTML blocks and enough list item tracking to
//! measure fence indentation relative to the item, so the line scan agrees
//! with the markdown parser on which `#` lines are headings.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::{FenceTracker, leading_columns, strip_columns};
use crate::headings::parse_atx;
use crate::html_block::HtmlBlockTracker;

/// Bullet or ordered list marker with up to three spaces of indentation.
static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?:[-+*]|[0-9]{1,9}[.)])(?: *)").unwrap());

/// Classifies each line as literal (code or raw HTML) or markdown.
#[derive(Debug, Default)]
pub(crate) struct BlockTracker {
    fences: FenceTracker,
    html: HtmlBlockTracker,
    /// Content column of the innermost list item, if one is open.
    list_col: Option<usize>,
    /// Column the open fence is relative to.
    fence_col: usize,
    /// Whether the previous line was paragraph text.
    in_paragraph: bool,
}

impl BlockTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed the next line.
    ///
    /// Returns `true` when the line is literal content: part of a fenced
    /// code block or a raw HTML block, delimiters included.
    pub(crate) fn consume(&mut self, line: &str) -> bool {
        let blank = line.trim().is_empty();

        if self.fences.is_open() {
            if blank || leading_columns(line) >= self.fence_col {
                self.fences.consume(strip_columns(line, self.fence_col));
                self.in_paragraph = false;
                return true;
            }
            // The list item holding the fence ended.
            self.fences.close();
            self.list_col = None;
        }

        if self.html.is_open() && self.html.continue_block(line) {
            self.in_paragraph = false;
            return true;
        }

        let (content, col) = self.enter_container(line, blank);
        if self.fences.consume(content) {
            self.fence_col = col;
            self.in_paragraph = false;
            return true;
        }
        if self.html.try_open(content, self.in_paragraph) {
            self.in_paragraph = false;
            return true;
        }

        let indented_code = !self.in_paragraph && leading_columns(content) >= 4;
        self.in_paragraph = !blank && !indented_code && parse_atx(line).is_none();
        false
    }

    /// Strip list item indentation, returning the line relative to its
    /// container and the container's column.
    fn enter_container<'a>(&mut self, line: &'a str, blank: bool) -> (&'a str, usize) {
        let mut col = 0;
        let mut content = line;

        if let Some(list_col) = self.list_col {
            if blank {
                return (line, list_col);
            }
            if leading_columns(line) >= list_col {
                col = list_col;
                content = strip_columns(line, list_col);
            } else {
                self.list_col = None;
            }
        }

        match list_marker_width(content) {
            Some(width) => {
                let item_col = col + leading_columns(content) + width;
                self.list_col = Some(item_col);
                let start = content.len() - content.trim_start().len() + width;
                (content.get(start..).unwrap_or(""), item_col)
            }
            None => (content, col),
        }
    }
}

/// Width of a list marker and the spaces after it, counted from the first
/// non-space character. When the item is empty or its text starts five or
/// more columns past the marker, content begins one column after it.
fn list_marker_width(line: &str) -> Option<usize> {
    let found = LIST_MARKER_RE.find(line)?;
    let marker = found.as_str().trim();
    let spaces = found.as_str().len() - found.as_str().trim_end().len();
    let rest = &line[found.end()..];
    let ends_line = rest.trim().is_empty();
    if spaces == 0 && !ends_line {
        return None;
    }
    if spaces > 4 || ends_line {
        return Some(marker.len() + 1);
    }
    Some(marker.len() + spaces)
}
