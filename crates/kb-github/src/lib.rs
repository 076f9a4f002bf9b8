//! GitHub-backed content access for KB.
//!
//! This crate fetches the knowledge-base repository through the GitHub
//! contents API and shields callers from upstream trouble:
//!
//! - [`ContentSource`]: Trait for upstreams serving listings and file bodies
//! - [`GithubSource`]: REST implementation over a blocking `ureq` agent
//! - [`ContentClient`]: Cache, stale-on-error and static fallback policy
//!
//! With the `mock` feature, [`MockSource`] provides an in-memory repository
//! with injectable failures for tests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use kb_cache::MemoryCache;
//! use kb_github::{ContentClient, GithubSource, Repository, DEFAULT_API_URL};
//!
//! let repository = Repository::new("FrontendKnowledgeBase", "FrontendCompetencies", "main");
//! let source = GithubSource::new(DEFAULT_API_URL, repository, None);
//! let client = ContentClient::new(
//!     Arc::new(source),
//!     Arc::new(MemoryCache::new(Duration::from_secs(300))),
//! );
//!
//! let readme = client.file_content("README.md")?;
//! # Ok::<(), kb_github::FetchError>(())
//! ```

mod client;
mod error;
pub mod fallback;
mod github;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod source;
mod types;

pub use client::{ContentClient, DEFAULT_CONTENT_ROOT, DEFAULT_README_PATH};
pub use error::FetchError;
pub use github::{DEFAULT_API_URL, GithubSource, Repository};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockFailure, MockSource};
pub use source::ContentSource;
pub use types::{EntryKind, FileBody, FileEntry, file_name, parent_path};
