//! Extension trait for [`Cache`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Cache, CacheEntry};

/// Typed convenience methods for [`Cache`].
///
/// Lookups return the decoded value together with its staleness so callers
/// can decide between serving it and refreshing it. [`Cache`] stays
/// object-safe and byte-oriented; a blanket impl gives every cache these
/// helpers.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use kb_cache::{CacheExt, MemoryCache};
///
/// let cache = MemoryCache::new(Duration::from_secs(60));
/// cache.put_json("listing", &vec!["a", "b"]);
///
/// let (value, stale): (Vec<String>, bool) = cache.get_json("listing").unwrap();
/// assert_eq!(value, ["a", "b"]);
/// assert!(!stale);
/// ```
pub trait CacheExt: Cache {
    /// Retrieve a JSON-deserialized value and whether it is stale.
    ///
    /// Returns `None` on miss or when the stored bytes no longer decode.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<(T, bool)> {
        let entry = self.get(key)?;
        let stale = self.is_stale(&entry);
        let value = decode_json(key, &entry)?;
        Some((value, stale))
    }

    /// Store a value as JSON.
    ///
    /// Serialization failures are logged and the value is not cached.
    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.put(key, bytes),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to serialize cache value"),
        }
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

fn decode_json<T: DeserializeOwned>(key: &str, entry: &CacheEntry) -> Option<T> {
    serde_json::from_slice(entry.data())
        .inspect_err(|e| tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry"))
        .ok()
}
