//! Fenced code block detection for line-oriented scans.

/// An open fence: marker character and run length.
#[derive(Clone, Copy, Debug)]
struct Fence {
    marker: char,
    len: usize,
}

/// Follows fenced code blocks while a document is read line by line.
///
/// Fences use three or more backticks or tildes indented by at most three
/// spaces; deeper indentation is an indented code line. A block closes on a
/// line made of the same marker, at least as long as the opening run,
/// followed only by whitespace. An unclosed fence runs to the end of the
/// document.
///
/// Lines are expected relative to their container: callers strip list item
/// indentation first.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    /// Whether the last consumed line left a fence open.
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Force the open fence shut, as when its container ends.
    pub(crate) fn close(&mut self) {
        self.open = None;
    }

    /// Feed the next line.
    ///
    /// Returns `true` when the line belongs to a fenced block, delimiters
    /// included.
    pub(crate) fn consume(&mut self, line: &str) -> bool {
        if leading_columns(line) > MAX_FENCE_INDENT {
            return self.open.is_some();
        }
        let trimmed = line.trim_start();

        match self.open {
            Some(fence) => {
                if closes(trimmed, fence) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = opens(trimmed);
                self.open.is_some()
            }
        }
    }
}

/// Deepest indentation a fence delimiter may have.
const MAX_FENCE_INDENT: usize = 3;

/// Width of the leading whitespace, tabs advancing to the next multiple of
/// four.
pub(crate) fn leading_columns(line: &str) -> usize {
    let mut cols = 0;
    for c in line.chars() {
        match c {
            ' ' => cols += 1,
            '\t' => cols += 4 - cols % 4,
            _ => break,
        }
    }
    cols
}

/// Drop up to `n` columns of leading whitespace.
pub(crate) fn strip_columns(line: &str, n: usize) -> &str {
    let mut cols = 0;
    for (i, c) in line.char_indices() {
        if cols >= n {
            return &line[i..];
        }
        match c {
            ' ' => cols += 1,
            '\t' => cols += 4 - cols % 4,
            _ => return &line[i..],
        }
    }
    ""
}

fn opens(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = run_length(trimmed, marker);
    if len < 3 {
        return None;
    }
    // A backtick fence's info string cannot contain backticks.
    if marker == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes(trimmed: &str, fence: Fence) -> bool {
    let len = run_length(trimmed, fence.marker);
    len >= fence.len && trimmed[len..].trim().is_empty()
}

/// Number of leading `marker` characters. Markers are ASCII, so this is also
/// a byte offset.
fn run_length(s: &str, marker: char) -> usize {
    s.chars().take_while(|&c| c == marker).count()
}
