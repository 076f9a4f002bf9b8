//! Cache service for KB.
//!
//! This crate provides an injectable, time-bounded cache that decouples the
//! fetch client from any process-wide state. Two traits form the core API:
//!
//! - [`Cache`]: Key-value store whose entries carry the time they were stored
//! - [`Clock`]: Source of the current time, replaceable in tests
//!
//! # Implementations
//!
//! - [`MemoryCache`]: In-memory map with a fixed time-to-live
//! - [`NullCache`]: No-op implementation (always misses)
//!
//! Expired entries are never evicted. A stale entry stays readable so that
//! callers can fall back to it when a refresh fails.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use kb_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new(Duration::from_secs(300));
//! cache.put("file-content-README.md", b"# Hello".to_vec());
//!
//! let entry = cache.get("file-content-README.md").unwrap();
//! assert!(!cache.is_stale(&entry));
//! assert_eq!(entry.data(), b"# Hello");
//! ```

mod clock;
mod ext;
mod memory;

use std::time::SystemTime;

#[cfg(feature = "mock")]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use ext::CacheExt;
pub use memory::MemoryCache;

/// A cached value together with the moment it was stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    data: Vec<u8>,
    stored_at: SystemTime,
}

impl CacheEntry {
    /// Create an entry stored at the given time.
    #[must_use]
    pub fn new(data: Vec<u8>, stored_at: SystemTime) -> Self {
        Self { data, stored_at }
    }

    /// Raw payload bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Time at which the entry was written.
    #[must_use]
    pub fn stored_at(&self) -> SystemTime {
        self.stored_at
    }
}

/// Key-value cache with time-based staleness.
///
/// `get` returns entries regardless of their age; freshness is a separate
/// question answered by [`is_stale`](Cache::is_stale). This lets callers
/// serve an expired value when the upstream is unreachable.
pub trait Cache: Send + Sync {
    /// Look up an entry, fresh or stale.
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Store a value, replacing any previous entry for `key`.
    fn put(&self, key: &str, value: Vec<u8>);

    /// Whether the entry has outlived the cache's time-to-live.
    fn is_stale(&self, entry: &CacheEntry) -> bool;
}

/// No-op [`Cache`] that never stores or retrieves data.
///
/// Use when caching is disabled. Every lookup misses, so the stale-on-error
/// fallback never applies either.
pub struct NullCache;

impl Cache for NullCache {
    fn get(&self, _key: &str) -> Option<CacheEntry> {
        None
    }

    fn put(&self, _key: &str, _value: Vec<u8>) {}

    fn is_stale(&self, _entry: &CacheEntry) -> bool {
        true
    }
}
