//! In-memory cache with a fixed time-to-live.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::{Cache, CacheEntry, Clock, SystemClock};

/// In-memory [`Cache`] where entries become stale after a fixed TTL.
///
/// Writes are last-write-wins. Concurrent population of the same key is
/// harmless because both writers store the same upstream value.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Create a cache using the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache driven by a custom clock.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, fresh or stale.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: Vec<u8>) {
        let entry = CacheEntry::new(value, self.clock.now());
        self.entries.write().unwrap().insert(key.to_owned(), entry);
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        // A clock that went backwards yields an error here; treat as fresh.
        match self.clock.now().duration_since(entry.stored_at()) {
            Ok(age) => age >= self.ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::SystemTime;

    use super::*;

    struct TestClock(Mutex<SystemTime>);

    impl TestClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(SystemTime::UNIX_EPOCH)))
        }

        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> SystemTime {
            *self.0.lock().unwrap()
        }
    }

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_get_missing_key() {
        let cache = MemoryCache::new(TTL);
        assert_eq!(cache.get("nope"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get_is_fresh() {
        let clock = TestClock::new();
        let cache = MemoryCache::with_clock(TTL, Arc::clone(&clock) as Arc<dyn Clock>);

        cache.put("k", b"v".to_vec());
        clock.advance(Duration::from_secs(299));

        let entry = cache.get("k").unwrap();
        assert_eq!(entry.data(), b"v");
        assert!(!cache.is_stale(&entry));
    }

    #[test]
    fn test_entry_becomes_stale_at_ttl() {
        let clock = TestClock::new();
        let cache = MemoryCache::with_clock(TTL, Arc::clone(&clock) as Arc<dyn Clock>);

        cache.put("k", b"v".to_vec());
        clock.advance(TTL);

        let entry = cache.get("k").unwrap();
        assert!(cache.is_stale(&entry));
    }

    #[test]
    fn test_stale_entry_is_still_readable() {
        let clock = TestClock::new();
        let cache = MemoryCache::with_clock(TTL, Arc::clone(&clock) as Arc<dyn Clock>);

        cache.put("k", b"old".to_vec());
        clock.advance(Duration::from_secs(3600));

        assert_eq!(cache.get("k").unwrap().data(), b"old");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_overwrites_and_refreshes_timestamp() {
        let clock = TestClock::new();
        let cache = MemoryCache::with_clock(TTL, Arc::clone(&clock) as Arc<dyn Clock>);

        cache.put("k", b"old".to_vec());
        clock.advance(TTL);
        cache.put("k", b"new".to_vec());

        let entry = cache.get("k").unwrap();
        assert_eq!(entry.data(), b"new");
        assert!(!cache.is_stale(&entry));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_from_the_future_is_fresh() {
        let cache = MemoryCache::with_clock(TTL, TestClock::new());
        let entry = CacheEntry::new(Vec::new(), SystemTime::UNIX_EPOCH + TTL);
        assert!(!cache.is_stale(&entry));
    }
}
