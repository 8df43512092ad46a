//! In-memory TTL cache for normalized alert slices.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::debug;

/// A cached payload with its absolute expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    expires_at: Instant,
}

/// Generic in-process key/value store with per-entry TTL.
///
/// Expired entries are evicted lazily on read; there is no background
/// sweeper. Contents are not persisted across restarts.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, evicting the entry first if its TTL has elapsed.
    pub fn get(&self, key: &str) -> Option<T> {
        let Ok(mut entries) = self.entries.write() else {
            return None;
        };
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(key = %key, "evicted expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Insert or replace an entry; expiry is `ttl` from now.
    pub fn set(&self, key: impl Into<String>, payload: T, ttl: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.into(),
                CacheEntry {
                    payload,
                    expires_at: Instant::now() + ttl,
                },
            );
        }
    }

    /// Evict every key starting with `prefix`, or everything when `None`.
    pub fn invalidate(&self, prefix: Option<&str>) {
        if let Ok(mut entries) = self.entries.write() {
            match prefix {
                Some(prefix) => entries.retain(|key, _| !key.starts_with(prefix)),
                None => entries.clear(),
            }
        }
    }

    /// Push an existing entry's expiry further into the future.
    ///
    /// A no-op when the key is absent; extension never creates entries.
    pub fn extend_ttl(&self, key: &str, additional: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            if let Some(entry) = entries.get_mut(key) {
                entry.expires_at += additional;
                debug!(key = %key, additional_secs = additional.as_secs(), "extended cache TTL");
            }
        }
    }

    /// Time left until the entry expires, without evicting it.
    #[must_use]
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .map(|entry| entry.expires_at.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_roundtrip() {
        let cache = TtlCache::new();
        cache.set("k", vec![1, 2, 3], Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_get_missing_key() {
        let cache: TtlCache<String> = TtlCache::new();
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = TtlCache::new();
        cache.set("k", "v".to_string(), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(25));

        assert_eq!(cache.get("k"), None);
        // The read removed the entry, not just hid it
        assert_eq!(cache.ttl_remaining("k"), None);
    }

    #[test]
    fn test_set_replaces_existing_entry() {
        let cache = TtlCache::new();
        cache.set("k", 1, Duration::from_secs(60));
        cache.set("k", 2, Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_invalidate_all() {
        let cache = TtlCache::new();
        cache.set("a", 1, Duration::from_secs(60));
        cache.set("b", 2, Duration::from_secs(60));

        cache.invalidate(None);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_invalidate_by_prefix() {
        let cache = TtlCache::new();
        cache.set("github:org/a:code_scanning", 1, Duration::from_secs(60));
        cache.set("github:org/a:dependabot", 2, Duration::from_secs(60));
        cache.set("github:org/b:code_scanning", 3, Duration::from_secs(60));

        cache.invalidate(Some("github:org/a:"));

        assert_eq!(cache.get("github:org/a:code_scanning"), None);
        assert_eq!(cache.get("github:org/a:dependabot"), None);
        assert_eq!(cache.get("github:org/b:code_scanning"), Some(3));
    }

    #[test]
    fn test_extend_ttl_postpones_expiry() {
        let cache = TtlCache::new();
        cache.set("k", 1, Duration::from_secs(60));
        let before = cache.ttl_remaining("k").unwrap();

        cache.extend_ttl("k", Duration::from_secs(300));

        let after = cache.ttl_remaining("k").unwrap();
        assert!(after > before);
        assert!(after > Duration::from_secs(300));
    }

    #[test]
    fn test_extend_ttl_on_absent_key_is_noop() {
        let cache: TtlCache<i32> = TtlCache::new();
        cache.extend_ttl("missing", Duration::from_secs(300));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.ttl_remaining("missing"), None);
    }
}
