//! In-memory TTL cache for ranked search responses
//!
//! Process-local by design: search results go stale in seconds-to-minutes
//! (popularity shifts, live events), so a short TTL bounds staleness and no
//! cross-process invalidation is needed. Concurrent misses for the same key
//! may each recompute; coalescing is not worth its complexity at interactive
//! query volume.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cache statistics snapshot
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Live entries, including any not yet swept
    pub entries: usize,
    /// Entries past their TTL awaiting sweep
    pub expired: usize,
    /// Maximum entries held
    pub capacity: usize,
    /// Configured TTL
    pub ttl: Duration,
}

struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// A TTL + capacity bounded map keyed by canonical request strings.
///
/// Keys are hashed before storage so the map never holds raw query text.
/// Expired entries are never served; sweeping happens on insert.
pub struct QueryCache<T> {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> QueryCache<T> {
    /// Create a cache with the given TTL and entry capacity
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Hash a canonical key string into the stored key form
    #[must_use]
    pub fn hash_key(canonical: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Look up a canonical key. Expired entries read as misses.
    pub fn get(&self, canonical: &str) -> Option<T> {
        let key = Self::hash_key(canonical);
        let Ok(guard) = self.entries.read() else {
            return None;
        };
        guard
            .get(&key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    /// Insert a value under a canonical key, sweeping expired entries and,
    /// if the cache is still full, evicting the oldest entry.
    pub fn insert(&self, canonical: &str, value: T) {
        let key = Self::hash_key(canonical);
        let now = Instant::now();
        if let Ok(mut guard) = self.entries.write() {
            guard.retain(|_, entry| !entry.is_expired(now));

            if guard.len() >= self.capacity && !guard.contains_key(&key) {
                let oldest = guard
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    guard.remove(&oldest);
                }
            }

            guard.insert(
                key,
                CacheEntry {
                    value,
                    inserted_at: now,
                    expires_at: now + self.ttl,
                },
            );
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.write() {
            guard.clear();
        }
    }

    /// Number of entries currently held (expired-but-unswept included)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statistics snapshot
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let (entries, expired) = self
            .entries
            .read()
            .map(|guard| {
                let expired = guard.values().filter(|e| e.is_expired(now)).count();
                (guard.len(), expired)
            })
            .unwrap_or((0, 0));

        CacheStats {
            entries,
            expired,
            capacity: self.capacity,
            ttl: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache: QueryCache<Vec<String>> = QueryCache::new(Duration::from_secs(60), 10);
        cache.insert("q=pizza", vec!["a".to_string()]);
        assert_eq!(cache.get("q=pizza"), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_miss_is_none() {
        let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 10);
        assert_eq!(cache.get("q=nothing"), None);
    }

    #[test]
    fn test_expired_entry_reads_as_miss() {
        let cache: QueryCache<u32> = QueryCache::new(Duration::ZERO, 10);
        cache.insert("q=stale", 1);
        assert_eq!(cache.get("q=stale"), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 2);
        cache.insert("first", 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("second", 2);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("third", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("first"), None);
        assert_eq!(cache.get("second"), Some(2));
        assert_eq!(cache.get("third"), Some(3));
    }

    #[test]
    fn test_reinsert_same_key_does_not_evict() {
        let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_clear() {
        let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 10);
        cache.insert("a", 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_hashing_is_stable() {
        let first = QueryCache::<u32>::hash_key("q=pizza|types=place");
        let second = QueryCache::<u32>::hash_key("q=pizza|types=place");
        let different = QueryCache::<u32>::hash_key("q=pizza|types=event");

        assert_eq!(first, second);
        assert_ne!(first, different);
        // sha256 hex
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_stats_reports_expired() {
        let cache: QueryCache<u32> = QueryCache::new(Duration::ZERO, 10);
        cache.insert("a", 1);
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.capacity, 10);
    }
}
