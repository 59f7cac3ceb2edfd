//! OSRS Price Monitor - Grand Exchange price dashboard backend
//!
//! Serves item metadata and live prices from the OSRS Wiki prices API,
//! memoized in a TTL/LRU cache so polling clients don't hammer upstream.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod memo;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use memo::Memo;
pub use tasks::spawn_cleanup_task;
