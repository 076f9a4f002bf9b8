//! Mock content source for testing.
//!
//! Provides [`MockSource`] for exercising the client and assembler without
//! network access.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::error::FetchError;
use crate::source::ContentSource;
use crate::types::{EntryKind, FileBody, FileEntry, parent_path};

/// Line width GitHub uses when wrapping base64 bodies.
const BASE64_LINE_WIDTH: usize = 60;

/// Failure mode applied to every request while set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockFailure {
    /// Behave like an exhausted API quota.
    RateLimited,
    /// Behave like a server error.
    Unavailable,
}

/// In-memory repository.
///
/// Files are stored base64-encoded with line breaks, as the GitHub API
/// returns them. Adding a file registers it, and all its ancestors, in
/// the parent listings, in insertion order.
///
/// # Example
///
/// ```ignore
/// use kb_github::{ContentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_file("articles/1_html_css/0_html_css.md", "# HTML & CSS")
///     .with_file("articles/1_html_css/1_selectors.md", "# Selectors");
///
/// let listing = source.list_directory("articles/1_html_css").unwrap();
/// assert_eq!(listing.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    dirs: RwLock<BTreeMap<String, Vec<FileEntry>>>,
    files: RwLock<HashMap<String, FileBody>>,
    failure: RwLock<Option<MockFailure>>,
    failing_paths: RwLock<HashSet<String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockSource {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given markdown content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        let body = FileBody {
            kind: EntryKind::File,
            content: Some(encode_wrapped(content.as_bytes())),
            encoding: Some("base64".to_owned()),
        };
        self.insert_file(path, content.len() as u64, body)
    }

    /// Add a file whose body is raw bytes (for invalid UTF-8 cases).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_binary_file(self, path: &str, bytes: &[u8]) -> Self {
        let body = FileBody {
            kind: EntryKind::File,
            content: Some(encode_wrapped(bytes)),
            encoding: Some("base64".to_owned()),
        };
        self.insert_file(path, bytes.len() as u64, body)
    }

    /// Add a zero-length file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_empty_file(self, path: &str) -> Self {
        let body = FileBody {
            kind: EntryKind::File,
            content: Some(String::new()),
            encoding: Some("base64".to_owned()),
        };
        self.insert_file(path, 0, body)
    }

    /// Add an empty directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: &str) -> Self {
        let path = normalize(path);
        self.dirs.write().unwrap().entry(path.to_owned()).or_default();
        self.register(FileEntry::dir(path));
        self
    }

    /// Make every request for `path` fail with a server error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_path(self, path: &str) -> Self {
        self.failing_paths
            .write()
            .unwrap()
            .insert(normalize(path).to_owned());
        self
    }

    /// Set or clear the global failure mode.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_failure(&self, failure: Option<MockFailure>) {
        *self.failure.write().unwrap() = failure;
    }

    /// Number of upstream requests made for `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(normalize(path))
            .copied()
            .unwrap_or(0)
    }

    /// Number of upstream requests across all paths.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn insert_file(self, path: &str, size: u64, body: FileBody) -> Self {
        let path = normalize(path);
        self.files.write().unwrap().insert(path.to_owned(), body);
        self.register(FileEntry::file(path, size));
        self
    }

    /// Add `entry` to its parent listing, creating ancestors as needed.
    fn register(&self, entry: FileEntry) {
        let mut dirs = self.dirs.write().unwrap();
        let mut entry = entry;
        loop {
            let parent = parent_path(&entry.path).to_owned();
            let listing = dirs.entry(parent.clone()).or_default();
            if listing.iter().any(|e| e.path == entry.path) {
                return;
            }
            listing.push(entry);
            if parent.is_empty() {
                return;
            }
            entry = FileEntry::dir(&parent);
        }
    }

    /// Count the call and apply configured failures.
    fn request(&self, path: &str) -> Result<(), FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(path.to_owned())
            .or_insert(0) += 1;

        match *self.failure.read().unwrap() {
            Some(MockFailure::RateLimited) => return Err(FetchError::RateLimited),
            Some(MockFailure::Unavailable) => return Err(server_error()),
            None => {}
        }
        if self.failing_paths.read().unwrap().contains(path) {
            return Err(server_error());
        }
        Ok(())
    }
}

impl ContentSource for MockSource {
    fn list_directory(&self, path: &str) -> Result<Vec<FileEntry>, FetchError> {
        let path = normalize(path);
        self.request(path)?;

        if let Some(listing) = self.dirs.read().unwrap().get(path) {
            return Ok(listing.clone());
        }
        if let Some(body) = self.files.read().unwrap().get(path) {
            let size = body.content.as_ref().map_or(0, |c| c.len() as u64);
            return Ok(vec![FileEntry::file(path, size)]);
        }
        Err(FetchError::NotFound(path.to_owned()))
    }

    fn get_file(&self, path: &str) -> Result<FileBody, FetchError> {
        let path = normalize(path);
        self.request(path)?;

        if let Some(body) = self.files.read().unwrap().get(path) {
            return Ok(body.clone());
        }
        if self.dirs.read().unwrap().contains_key(path) {
            return Ok(FileBody {
                kind: EntryKind::Dir,
                content: None,
                encoding: None,
            });
        }
        Err(FetchError::NotFound(path.to_owned()))
    }
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

fn server_error() -> FetchError {
    FetchError::HttpResponse {
        status: 503,
        body: "Service Unavailable".to_owned(),
    }
}

/// Base64 with a newline after every line, like GitHub's `content` field.
fn encode_wrapped(bytes: &[u8]) -> String {
    let encoded = BASE64_STANDARD.encode(bytes);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 1);
    for chunk in encoded.as_bytes().chunks(BASE64_LINE_WIDTH) {
        // Base64 output is ASCII, so every chunk is valid UTF-8.
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out
}
