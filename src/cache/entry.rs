//! Cache Entry Module
//!
//! A stored value together with its expiry timestamp.

use std::time::Duration;

// == Cache Entry ==
/// A single cache entry. `expires_at` is in Unix milliseconds taken from
/// the owning store's clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiry timestamp
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry inserted at `now_ms` that lives for `ttl`.
    pub fn new(value: V, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            value,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now_ms >= expires_at`, so a zero TTL is
    /// dead on arrival.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
