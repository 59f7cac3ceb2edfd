//! Memoizing Fetch Module
//!
//! Cache-aside wrapper that sits between request handlers and the upstream
//! API: look the key up, and on a miss run the caller's producer and store
//! what it returns.
//!
//! Concurrent misses on the same key are not coalesced. Each caller that
//! misses runs its own producer, and whichever write lands last wins.

use std::any::{type_name, Any};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::TtlStore;

/// Type-erased payload held by the shared store.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// Process-wide store handle shared by `Memo` and the cleanup task.
pub type SharedStore = Arc<RwLock<TtlStore<CachedValue>>>;

// == Memo ==
/// Cache-aside coordinator over a single shared [`TtlStore`].
///
/// Created once at startup and cloned into whatever needs it; all clones
/// share one store.
#[derive(Debug, Clone)]
pub struct Memo {
    store: SharedStore,
}

impl Memo {
    pub fn new(store: TtlStore<CachedValue>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    // == Memo ==
    /// Returns the cached value for `key`, or runs `producer` once and
    /// caches its result for `ttl`.
    ///
    /// Producer errors are returned unchanged and nothing is written, so a
    /// later call retries. The store lock is not held while the producer
    /// runs.
    ///
    /// A cached value of a different type than `T` counts as a miss and is
    /// overwritten by the fresh result.
    pub async fn memo<T, E, F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut mismatched = false;
        let cached = self.store.write().await.get_if(key, |value| {
            mismatched = !(**value).is::<T>();
            !mismatched
        });

        if let Some(hit) = cached.and_then(|value| value.downcast::<T>().ok()) {
            debug!(key, "cache hit");
            return Ok(hit);
        }
        if mismatched {
            warn!(key, expected = type_name::<T>(), "cached value has unexpected type, refetching");
        } else {
            debug!(key, "cache miss");
        }

        let value = Arc::new(producer().await?);
        let erased: CachedValue = value.clone();
        self.store.write().await.set(key, erased, ttl);

        Ok(value)
    }
}
