//! LRU Tracker Module
//!
//! Recency ordering for cache eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for least-recently-used eviction.
///
/// Every touch stamps the key with a fresh, strictly increasing tick.
/// `order` maps tick to key, so its first element is the least recently
/// used key; `ticks` maps key back to its current tick.
#[derive(Debug, Default)]
pub struct LruTracker {
    next_tick: u64,
    ticks: HashMap<String, u64>,
    order: BTreeMap<u64, String>,
}

impl LruTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        match self.ticks.get_mut(key) {
            Some(old) => {
                self.order.remove(old);
                *old = tick;
            }
            None => {
                self.ticks.insert(key.to_string(), tick);
            }
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Number of tracked keys; always equals the store's entry count.
    pub(crate) fn len(&self) -> usize {
        self.ticks.len()
    }
}
