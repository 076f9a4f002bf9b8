//! Wire types of the GitHub contents API.

use serde::{Deserialize, Serialize};

/// Kind of a repository entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Path from the repository root.
    pub path: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl FileEntry {
    /// Synthetic directory entry, named after the last path segment.
    #[must_use]
    pub fn dir(path: &str) -> Self {
        Self::synthetic(path, EntryKind::Dir, 0)
    }

    /// Synthetic file entry, named after the last path segment.
    #[must_use]
    pub fn file(path: &str, size: u64) -> Self {
        Self::synthetic(path, EntryKind::File, size)
    }

    fn synthetic(path: &str, kind: EntryKind, size: u64) -> Self {
        Self {
            name: file_name(path).to_owned(),
            path: path.to_owned(),
            sha: String::new(),
            size,
            kind,
            download_url: None,
            html_url: None,
        }
    }

    /// Whether this is a regular file with a `.md` extension.
    #[must_use]
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    pub fn is_markdown_file(&self) -> bool {
        self.kind == EntryKind::File && self.name.ends_with(".md")
    }
}

/// Single-item response of the contents API for a path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBody {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Encoded file body. Absent for directories and empty for files too
    /// large to inline.
    #[serde(default)]
    pub content: Option<String>,
    /// Body encoding, normally `base64`.
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Last segment of a slash-separated path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parent of a slash-separated path, empty for top-level entries.
#[must_use]
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}
