//! Response DTOs for the price API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::upstream::{LatestPrice, MappingRow, WindowRow};

/// Body of `GET /api/mapping`
///
/// Holds the cached catalogue itself rather than a copy of it.
#[derive(Debug, Clone, Serialize)]
pub struct MappingResponse {
    pub data: Arc<Vec<MappingRow>>,
}

/// Body of `GET /api/prices`
#[derive(Debug, Clone, Serialize)]
pub struct PricesResponse {
    /// Latest trade per item id
    pub latest: HashMap<String, LatestPrice>,
    /// Window averages per item id
    pub window: HashMap<String, WindowRow>,
    /// Server time the response was assembled, Unix milliseconds
    pub ts: i64,
}

impl PricesResponse {
    pub fn new(latest: HashMap<String, LatestPrice>, window: HashMap<String, WindowRow>) -> Self {
        Self {
            latest,
            window,
            ts: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Entries currently held
    pub total_entries: usize,
    /// Maximum entries before eviction
    pub capacity: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
