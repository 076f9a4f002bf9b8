//! Content source abstraction.

use crate::error::FetchError;
use crate::types::{FileBody, FileEntry};

/// Upstream that serves repository listings and file bodies.
///
/// Implementations perform no caching; [`ContentClient`](crate::ContentClient)
/// layers cache and fallback policy on top.
pub trait ContentSource: Send + Sync {
    /// List the entries of a directory.
    ///
    /// A path naming a single file yields a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails or the response is malformed.
    fn list_directory(&self, path: &str) -> Result<Vec<FileEntry>, FetchError>;

    /// Fetch a file with its still-encoded body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails or the response is malformed.
    fn get_file(&self, path: &str) -> Result<FileBody, FetchError>;
}
