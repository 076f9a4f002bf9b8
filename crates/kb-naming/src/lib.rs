//! Naming conventions for knowledge-base content.
//!
//! Files and directories in the content repository are named
//! `<order>_<slug>`, optionally followed by `.md`:
//!
//! ```text
//! articles/
//! ├── 1_html_css/
//! │   ├── 0_html_css.md      # main page (order prefix exactly "0")
//! │   ├── 1_selectors.md     # order 1, slug "selectors"
//! │   └── 2_box_model.md
//! └── notes/                 # no prefix: order 999
//! ```
//!
//! Editors occasionally leave duplicate artifacts such as `3_hooks copy.md`
//! or `3_hooks (1).md`. Stripping those is a [`SlugNormalizer`] step so the
//! heuristic can be swapped or disabled.
//!
//! # Example
//!
//! ```
//! use kb_naming::{DuplicateSuffixNormalizer, SlugNormalizer, parse_name, title_case};
//!
//! let parts = parse_name("3_hooks copy.md");
//! assert_eq!(parts.order, 3);
//! assert!(!parts.is_main_page);
//! assert_eq!(DuplicateSuffixNormalizer.normalize(&parts.slug), "hooks");
//!
//! assert_eq!(title_case("html_css"), "Html Css");
//! ```

use std::borrow::Cow;

/// Order assigned to names without a numeric prefix.
pub const DEFAULT_ORDER: u32 = 999;

/// Components of a content file or directory name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameParts {
    /// Numeric order prefix, or [`DEFAULT_ORDER`].
    pub order: u32,
    /// Name without order prefix and `.md` extension. Underscores are kept.
    pub slug: String,
    /// Whether the order prefix is exactly `0`.
    pub is_main_page: bool,
}

/// Parse a file or directory name into order, slug and main-page flag.
///
/// Names that do not match `<digits>_<rest>` keep their full (extension-less)
/// name as slug. A prefix too large for `u32` falls back to
/// [`DEFAULT_ORDER`] while the prefix is still removed.
#[must_use]
pub fn parse_name(name: &str) -> NameParts {
    let stem = name.strip_suffix(".md").unwrap_or(name);

    match split_order_prefix(stem) {
        Some((prefix, rest)) => NameParts {
            order: prefix.parse().unwrap_or(DEFAULT_ORDER),
            slug: rest.to_owned(),
            is_main_page: prefix == "0",
        },
        None => NameParts {
            order: DEFAULT_ORDER,
            slug: stem.to_owned(),
            is_main_page: false,
        },
    }
}

/// Remove a leading `<digits>_` prefix, if any.
#[must_use]
pub fn strip_order_prefix(name: &str) -> &str {
    split_order_prefix(name).map_or(name, |(_, rest)| rest)
}

/// Split `<digits>_<rest>` into its two parts. `rest` must be non-empty.
fn split_order_prefix(name: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = name.split_once('_')?;
    if prefix.is_empty() || rest.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((prefix, rest))
}

/// Post-processing step applied to article slugs.
pub trait SlugNormalizer: Send + Sync {
    /// Return the normalized slug.
    fn normalize<'a>(&self, slug: &'a str) -> Cow<'a, str>;
}

/// Strips editor duplicate artifacts from slugs.
///
/// Removes a trailing ` copy` (any case), then a trailing ` (<digits>)`, then
/// surrounding whitespace. Both suffixes need at least one whitespace
/// character before them, so `photocopy` and `list(2)` are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct DuplicateSuffixNormalizer;

impl SlugNormalizer for DuplicateSuffixNormalizer {
    fn normalize<'a>(&self, slug: &'a str) -> Cow<'a, str> {
        let slug = strip_copy_suffix(slug);
        let slug = strip_counter_suffix(slug);
        Cow::Borrowed(slug.trim())
    }
}

/// Leaves slugs untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityNormalizer;

impl SlugNormalizer for IdentityNormalizer {
    fn normalize<'a>(&self, slug: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(slug)
    }
}

fn strip_copy_suffix(slug: &str) -> &str {
    const SUFFIX: &str = "copy";

    let Some(split) = slug.len().checked_sub(SUFFIX.len()) else {
        return slug;
    };
    if !slug.is_char_boundary(split) || !slug[split..].eq_ignore_ascii_case(SUFFIX) {
        return slug;
    }
    strip_required_whitespace(&slug[..split]).unwrap_or(slug)
}

fn strip_counter_suffix(slug: &str) -> &str {
    let Some(inner) = slug.strip_suffix(')') else {
        return slug;
    };
    let digits_start = inner.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits_start == inner.len() {
        return slug;
    }
    inner[..digits_start]
        .strip_suffix('(')
        .and_then(strip_required_whitespace)
        .unwrap_or(slug)
}

/// Trim trailing whitespace, or `None` when there was none.
fn strip_required_whitespace(head: &str) -> Option<&str> {
    let trimmed = head.trim_end();
    (trimmed.len() < head.len()).then_some(trimmed)
}

/// Human-readable title from a slug.
///
/// Underscores become spaces, whitespace runs collapse, and the first letter
/// of every word (and of every hyphen-separated part) is uppercased. The rest
/// of each word is kept as is.
#[must_use]
pub fn title_case(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
    {
        if !result.is_empty() {
            result.push(' ');
        }
        for (i, part) in word.split('-').enumerate() {
            if i > 0 {
                result.push('-');
            }
            capitalize_first_into(part, &mut result);
        }
    }
    result
}

fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

/// Title shown for a file or directory name before its content is known.
///
/// Drops the `.md` extension and order prefix, strips duplicate suffixes and
/// title-cases the remainder: `2_box_model copy.md` becomes `Box Model`.
#[must_use]
pub fn display_title(name: &str) -> String {
    let parts = parse_name(name);
    title_case(&DuplicateSuffixNormalizer.normalize(&parts.slug))
}
