//! Cache Store Module
//!
//! Bounded key-value store with per-entry TTL and LRU eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, Clock, LruTracker, SystemClock};

// == TTL Store ==
/// In-memory store with lazy TTL expiry and capacity-bounded LRU eviction.
///
/// Values are cloned out on `get`; callers that want shared, non-copied
/// payloads store an `Arc`.
#[derive(Debug)]
pub struct TtlStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlStore<V> {
    // == Constructor ==
    /// Creates a store backed by the system clock.
    ///
    /// A `max_entries` of zero is treated as one.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self::with_clock(max_entries, default_ttl, Arc::new(SystemClock))
    }

    /// Creates a store driven by the given clock.
    pub fn with_clock(max_entries: usize, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl,
            clock,
        }
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// A hit refreshes the key's recency. An expired entry is dropped and
    /// reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_if(key, |_| true)
    }

    /// Like `get`, but a live value rejected by `accept` counts as a miss
    /// and its recency is left untouched. The entry itself stays in place
    /// until overwritten.
    pub fn get_if(&mut self, key: &str, accept: impl FnOnce(&V) -> bool) -> Option<V> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let value = self
            .entries
            .get(key)
            .filter(|entry| accept(&entry.value))
            .map(|entry| entry.value.clone());

        match value {
            Some(value) => {
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or replaces `key`, expiring `ttl` from now.
    ///
    /// Inserting a new key into a full store first evicts exactly one
    /// entry, the least recently used, whether or not it has expired.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
        debug_assert_eq!(self.lru.len(), self.entries.len());
    }

    /// `set` with the store's default TTL.
    pub fn set_default(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.default_ttl;
        self.set(key, value, ttl);
    }

    // == Purge Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of held entries, including stale ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    const MINUTE: Duration = Duration::from_secs(60);

    fn store_with_clock(max_entries: usize) -> (TtlStore<String>, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = TtlStore::with_clock(max_entries, MINUTE, Arc::new(clock.clone()));
        (store, clock)
    }

    fn set(store: &mut TtlStore<String>, key: &str) {
        store.set(key, format!("{key}-value"), MINUTE);
    }

    #[test]
    fn test_store_new() {
        let store: TtlStore<String> = TtlStore::new(100, MINUTE);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.default_ttl(), MINUTE);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let (mut store, _) = store_with_clock(0);
        assert_eq!(store.capacity(), 1);

        set(&mut store, "a");
        set(&mut store, "b");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b").as_deref(), Some("b-value"));
    }

    #[test]
    fn test_miss_then_hit() {
        let (mut store, _) = store_with_clock(10);

        assert_eq!(store.get("latest"), None);
        set(&mut store, "latest");
        assert_eq!(store.get("latest").as_deref(), Some("latest-value"));
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let (mut store, clock) = store_with_clock(10);

        store.set("k", "v1".to_string(), Duration::from_secs(1));
        store.set("k", "v2".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(5));

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expiry_is_observed_on_read() {
        let (mut store, clock) = store_with_clock(10);

        store.set("k", "v".to_string(), Duration::from_millis(30_000));
        clock.advance(Duration::from_millis(29_999));
        assert!(store.get("k").is_some());

        clock.advance(Duration::from_millis(1));
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty(), "expired entry should be dropped on read");

        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_mapping_expires_after_one_day() {
        let clock = ManualClock::new(0);
        let mut store = TtlStore::with_clock(500, MINUTE, Arc::new(clock.clone()));
        let mapping = Arc::new(json!({"id": 1, "name": "Shark"}));

        store.set("mapping", mapping.clone(), Duration::from_millis(86_400_000));
        assert_eq!(store.get("mapping"), Some(mapping));

        clock.advance(Duration::from_millis(86_400_001));
        assert_eq!(store.get("mapping"), None);
    }

    #[test]
    fn test_lru_eviction_of_oldest_insert() {
        let (mut store, _) = store_with_clock(3);

        set(&mut store, "key1");
        set(&mut store, "key2");
        set(&mut store, "key3");
        set(&mut store, "key4");

        let stats = store.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_lru_touch_on_get() {
        let (mut store, _) = store_with_clock(3);

        set(&mut store, "key1");
        set(&mut store, "key2");
        set(&mut store, "key3");
        store.get("key1");
        set(&mut store, "key4");

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (mut store, _) = store_with_clock(2);

        set(&mut store, "a");
        set(&mut store, "b");
        store.set("a", "a2".to_string(), MINUTE);

        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.get("a").as_deref(), Some("a2"));
        assert!(store.get("b").is_some());
    }

    #[test]
    fn test_eviction_ignores_expiry() {
        let (mut store, _) = store_with_clock(2);

        // "short" is newer but about to expire; "long" is older and is the one evicted.
        store.set("long", "l".to_string(), Duration::from_secs(3_600));
        store.set("short", "s".to_string(), Duration::from_millis(1));
        set(&mut store, "new");

        assert_eq!(store.get("long"), None);
        assert_eq!(store.get("short").as_deref(), Some("s"));
    }

    #[test]
    fn test_set_default_uses_default_ttl() {
        let (mut store, clock) = store_with_clock(10);

        store.set_default("k", "v".to_string());
        clock.advance(MINUTE - Duration::from_millis(1));
        assert!(store.get("k").is_some());
        clock.advance(Duration::from_millis(1));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_rejected_value_counts_as_miss() {
        let (mut store, _) = store_with_clock(2);

        set(&mut store, "a");
        set(&mut store, "b");
        assert_eq!(store.get_if("a", |v| v.starts_with('x')), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(store.len(), 2, "rejected entry is kept until overwritten");

        // The rejected read did not refresh "a", so it is still the LRU victim.
        set(&mut store, "c");
        assert_eq!(store.get("a"), None);
        assert!(store.get("b").is_some());
    }

    #[test]
    fn test_purge_expired() {
        let (mut store, clock) = store_with_clock(10);

        store.set("short", "s".to_string(), Duration::from_secs(1));
        store.set("long", "l".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(2));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().expirations, 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_with_clock(10);

        set(&mut store, "key1");
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
