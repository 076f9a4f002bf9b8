//! Fetch-and-cache client.
//!
//! Every request goes through the same policy:
//!
//! 1. A fresh cache entry is returned without contacting the upstream.
//! 2. Otherwise the upstream is asked; a success is cached and returned.
//! 3. A failed refresh falls back to the stale entry when one exists.
//! 4. With no entry at all, rate limiting is answered with static fallback
//!    content (see [`crate::fallback`]).
//! 5. Any other failure is returned to the caller.

use std::sync::Arc;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use kb_cache::{Cache, CacheExt};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::fallback::{README_FALLBACK, fallback_structure, placeholder_markdown};
use crate::source::ContentSource;
use crate::types::{EntryKind, FileEntry};

/// Directory holding the category folders.
pub const DEFAULT_CONTENT_ROOT: &str = "articles";

/// Repository README path.
pub const DEFAULT_README_PATH: &str = "README.md";

/// Client combining a [`ContentSource`] with a [`Cache`].
pub struct ContentClient {
    source: Arc<dyn ContentSource>,
    cache: Arc<dyn Cache>,
    content_root: String,
    readme_path: String,
}

impl ContentClient {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, cache: Arc<dyn Cache>) -> Self {
        Self {
            source,
            cache,
            content_root: DEFAULT_CONTENT_ROOT.to_owned(),
            readme_path: DEFAULT_README_PATH.to_owned(),
        }
    }

    /// Set the directory whose listing is replaced by fallback categories.
    #[must_use]
    pub fn with_content_root(mut self, root: impl Into<String>) -> Self {
        self.content_root = root.into().trim_matches('/').to_owned();
        self
    }

    /// Set the path whose content is replaced by the README fallback.
    #[must_use]
    pub fn with_readme_path(mut self, path: impl Into<String>) -> Self {
        self.readme_path = path.into();
        self
    }

    #[must_use]
    pub fn content_root(&self) -> &str {
        &self.content_root
    }

    #[must_use]
    pub fn readme_path(&self) -> &str {
        &self.readme_path
    }

    /// List a repository directory.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the upstream fails with no cached or
    /// fallback listing to substitute.
    pub fn repository_structure(&self, path: &str) -> Result<Vec<FileEntry>, FetchError> {
        let key = format!("repo-structure-{path}");
        self.cached(&key, || self.source.list_directory(path))
            .or_else(|err| {
                if !err.is_rate_limited() {
                    return Err(err);
                }
                tracing::warn!(path = %path, "Rate limited, serving fallback structure");
                if path.trim_matches('/') == self.content_root {
                    Ok(fallback_structure(&self.content_root))
                } else {
                    Ok(Vec::new())
                }
            })
    }

    /// Fetch and decode a file's markdown.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the upstream fails with no cached or
    /// fallback content to substitute, or if the body cannot be decoded.
    pub fn file_content(&self, path: &str) -> Result<String, FetchError> {
        let key = format!("file-content-{path}");
        self.cached(&key, || self.download(path)).or_else(|err| {
            if !err.is_rate_limited() {
                return Err(err);
            }
            tracing::warn!(path = %path, "Rate limited, serving fallback content");
            if path == self.readme_path {
                Ok(README_FALLBACK.to_owned())
            } else {
                Ok(placeholder_markdown(path))
            }
        })
    }

    fn download(&self, path: &str) -> Result<String, FetchError> {
        let body = self.source.get_file(path)?;
        if body.kind != EntryKind::File {
            return Err(FetchError::NotAFile(path.to_owned()));
        }

        let content = body.content.unwrap_or_default();
        if content.trim().is_empty() {
            tracing::warn!(path = %path, "File is empty, using placeholder content");
            return Ok(placeholder_markdown(path));
        }

        match body.encoding.as_deref() {
            None | Some("base64") => decode_base64(&content),
            Some(_) => Ok(content),
        }
    }

    /// Apply the cache policy around `fetch`.
    fn cached<T, F>(&self, key: &str, fetch: F) -> Result<T, FetchError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, FetchError>,
    {
        let stale = match self.cache.get_json::<T>(key) {
            Some((value, false)) => {
                tracing::debug!(key = %key, "Cache hit");
                return Ok(value);
            }
            Some((value, true)) => Some(value),
            None => None,
        };

        match fetch() {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache miss, fetched from upstream");
                self.cache.put_json(key, &value);
                Ok(value)
            }
            Err(err) => match stale {
                Some(value) => {
                    tracing::warn!(key = %key, error = %err, "Upstream failed, serving stale cache");
                    Ok(value)
                }
                None => Err(err),
            },
        }
    }
}

/// Decode a base64 body that may contain line breaks.
fn decode_base64(content: &str) -> Result<String, FetchError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64_STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
