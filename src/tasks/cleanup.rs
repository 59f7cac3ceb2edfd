//! TTL Cleanup Task
//!
//! Background task that periodically purges expired cache entries.
//! Expiry is already enforced on read; the sweep only frees memory held
//! by entries nobody asks for again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memo::SharedStore;

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// The write lock is held only for the duration of one purge. Abort the
/// returned handle to stop the task.
///
/// # Example
/// ```ignore
/// let memo = Memo::new(TtlStore::new(500, Duration::from_secs(60)));
/// let cleanup_handle = spawn_cleanup_task(memo.store(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: SharedStore, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.write().await.purge_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
