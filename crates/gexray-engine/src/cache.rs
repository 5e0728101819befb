//! Time-bounded result cache.
//!
//! One cache abstraction with one invalidation policy: entries live for a
//! fixed TTL and are discarded and recomputed afterwards, never refreshed in
//! place. The map is mutex-guarded; the compute closure runs under the lock,
//! which gives single-writer-at-a-time discipline and prevents duplicate
//! recomputation when two callers race on the same key.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    inserted_at: Instant,
    value: V,
}

/// Mutex-guarded TTL cache with `get_or_try_compute` semantics.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// Creates a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // A poisoned lock only means another caller panicked mid-insert;
        // the map itself is still a valid cache.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a clone of the cached value if present and fresh.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone())
            }
            _ => {}
        }
        entries.remove(key);
        None
    }

    /// Stores a value, replacing any previous entry for the key.
    pub fn insert(&self, key: K, value: V) {
        self.lock().insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Returns the fresh cached value for `key`, or runs `compute`, caches
    /// its success, and returns it. Errors are not cached.
    pub fn get_or_try_compute<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        let mut entries = self.lock();

        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                metrics::counter!("gexray_cache_total", "result" => "hit").increment(1);
                return Ok(entry.value.clone());
            }
            _ => {}
        }
        entries.remove(&key);

        metrics::counter!("gexray_cache_total", "result" => "miss").increment(1);
        let value = compute()?;
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Drops every expired entry.
    pub fn purge_expired(&self) {
        self.lock()
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
    }

    /// Number of entries currently held, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_computes_then_hit_reuses() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_secs(60));
        let mut calls = 0;

        let first: Result<u32, ()> = cache.get_or_try_compute("SPY", || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(first.unwrap(), 7);

        let second: Result<u32, ()> = cache.get_or_try_compute("SPY", || {
            calls += 1;
            Ok(8)
        });
        assert_eq!(second.unwrap(), 7, "fresh entry must short-circuit compute");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_expired_entry_recomputes() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_millis(20));
        cache.insert("SPY", 7);
        std::thread::sleep(Duration::from_millis(30));

        assert!(cache.get(&"SPY").is_none());
        let value: Result<u32, ()> = cache.get_or_try_compute("SPY", || Ok(9));
        assert_eq!(value.unwrap(), 9);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_secs(60));

        let failed: Result<u32, &'static str> = cache.get_or_try_compute("SPY", || Err("boom"));
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let ok: Result<u32, &'static str> = cache.get_or_try_compute("SPY", || Ok(3));
        assert_eq!(ok.unwrap(), 3);
    }

    #[test]
    fn test_purge_expired_drops_only_stale_entries() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_millis(40));
        cache.insert("OLD", 1);
        std::thread::sleep(Duration::from_millis(50));
        cache.insert("NEW", 2);

        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"NEW"), Some(2));
    }
}
