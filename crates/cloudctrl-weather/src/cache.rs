//! In-memory TTL cache for weather payloads.
//!
//! Expiry is lazy: an entry is only removed when a read finds it stale.
//! There is no size bound and no background sweep, so entries that expire
//! and are never read again stay in memory.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe key/value store with per-entry expiry.
///
/// The lock is held only for the duration of a single map operation.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Insert or overwrite `key`, expiring after the default TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Insert or overwrite `key`, expiring after `ttl`.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Return the value for `key` if it has not expired. A stale entry is
    /// removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        let fresh = match entries.get(key) {
            None => return None,
            Some(entry) => Instant::now() < entry.expires_at,
        };

        if fresh {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.remove(key);
            tracing::debug!("Evicted expired cache entry: {}", key);
            None
        }
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let cache: CacheStore<u32> = CacheStore::default();
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.default_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn test_put_then_get() {
        let cache = CacheStore::default();
        cache.put("london", 42);
        assert_eq!(cache.get("london"), Some(42));
        // Reads do not consume the entry.
        assert_eq!(cache.get("london"), Some(42));
    }

    #[test]
    fn test_put_overwrites() {
        let cache = CacheStore::default();
        cache.put("k", "old".to_string());
        cache.put("k", "new".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_is_immediately_stale() {
        let cache = CacheStore::new(Duration::ZERO);
        cache.put("k", 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty(), "stale entry should be removed on read");
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = CacheStore::default();
        cache.put_with_ttl("short", 1, Duration::from_millis(100));
        cache.put_with_ttl("long", 2, Duration::from_secs(60));
        assert_eq!(cache.get("short"), Some(1));

        std::thread::sleep(Duration::from_millis(600));

        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unread_expired_entries_are_kept() {
        let cache = CacheStore::new(Duration::ZERO);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
    }
}
