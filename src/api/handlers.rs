//! API Handlers
//!
//! HTTP request handlers for the price endpoints.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::warn;

use crate::cache::TtlStore;
use crate::config::Config;
use crate::error::{AppError, Result, UpstreamError};
use crate::memo::{CachedValue, Memo};
use crate::models::{HealthResponse, MappingResponse, PricesQuery, PricesResponse, StatsResponse};
use crate::upstream::PriceSource;

pub const MAPPING_KEY: &str = "mapping";
pub const LATEST_KEY: &str = "latest";

/// How long each upstream response stays cached.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub mapping: Duration,
    pub prices: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            mapping: Duration::from_secs(24 * 60 * 60),
            prices: Duration::from_secs(30),
        }
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Memoizing fetch over the process-wide store
    pub memo: Memo,
    /// Upstream prices API
    pub source: Arc<dyn PriceSource>,
    pub ttls: CacheTtls,
}

impl AppState {
    pub fn new(store: TtlStore<CachedValue>, source: Arc<dyn PriceSource>, ttls: CacheTtls) -> Self {
        Self {
            memo: Memo::new(store),
            source,
            ttls,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, source: Arc<dyn PriceSource>) -> Self {
        let store = TtlStore::new(config.max_entries, config.default_ttl());
        let ttls = CacheTtls {
            mapping: Duration::from_millis(config.mapping_ttl_ms),
            prices: Duration::from_millis(config.prices_ttl_ms),
        };
        Self::new(store, source, ttls)
    }
}

/// Handler for GET /api/mapping
///
/// Returns the full item catalogue, cached for a day.
pub async fn mapping_handler(State(state): State<AppState>) -> Result<Json<MappingResponse>> {
    let source = state.source.clone();
    let mapping = state
        .memo
        .memo(MAPPING_KEY, state.ttls.mapping, || async move {
            source.fetch_mapping().await
        })
        .await
        .map_err(log_upstream)?;

    Ok(Json(MappingResponse { data: mapping }))
}

/// Handler for GET /api/prices?ids=&win=
///
/// Returns latest and windowed prices, optionally narrowed to `ids`.
pub async fn prices_handler(
    State(state): State<AppState>,
    Query(query): Query<PricesQuery>,
) -> Result<Json<PricesResponse>> {
    let window = query.window().map_err(AppError::InvalidRequest)?;
    let window_key = window.cache_key();

    let latest_source = state.source.clone();
    let window_source = state.source.clone();

    let (latest, averages) = tokio::try_join!(
        state.memo.memo(LATEST_KEY, state.ttls.prices, || async move {
            latest_source.fetch_latest().await
        }),
        state.memo.memo(&window_key, state.ttls.prices, || async move {
            window_source.fetch_window(window).await
        }),
    )
    .map_err(log_upstream)?;

    let ids = query.item_ids();
    Ok(Json(PricesResponse::new(
        pick(&latest.data, ids.as_deref()),
        pick(&averages.data, ids.as_deref()),
    )))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.memo.store();
    let cache = store.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Copies the rows for `ids`, or every row when no filter is given.
/// Unknown ids are skipped.
fn pick<V: Clone>(rows: &HashMap<String, V>, ids: Option<&[String]>) -> HashMap<String, V> {
    match ids {
        None => rows.clone(),
        Some(ids) => ids
            .iter()
            .filter_map(|id| rows.get(id).map(|row| (id.clone(), row.clone())))
            .collect(),
    }
}

fn log_upstream(err: UpstreamError) -> UpstreamError {
    warn!(error = %err, "upstream fetch failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::upstream::{LatestPrice, LatestResponse, MappingRow, Window, WindowResponse, WindowRow};

    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PriceSource for FakeSource {
        async fn fetch_mapping(&self) -> std::result::Result<Vec<MappingRow>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UpstreamError::Status {
                    endpoint: "mapping".to_string(),
                    status: 502,
                });
            }
            Ok(vec![MappingRow {
                id: 385,
                name: "Shark".to_string(),
                examine: None,
                members: Some(true),
                limit: Some(10_000),
                value: None,
                highalch: None,
                lowalch: None,
                icon: None,
            }])
        }

        async fn fetch_latest(&self) -> std::result::Result<LatestResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let price = LatestPrice {
                high: Some(100),
                low: Some(90),
                ..LatestPrice::default()
            };
            Ok(LatestResponse {
                data: HashMap::from([("4151".to_string(), price.clone()), ("385".to_string(), price)]),
            })
        }

        async fn fetch_window(&self, _window: Window) -> std::result::Result<WindowResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WindowResponse {
                data: HashMap::from([("4151".to_string(), WindowRow::default())]),
                timestamp: None,
            })
        }
    }

    fn state_with(source: Arc<FakeSource>) -> AppState {
        AppState::new(
            TtlStore::new(100, Duration::from_secs(60)),
            source,
            CacheTtls::default(),
        )
    }

    #[tokio::test]
    async fn test_mapping_handler_caches() {
        let source = Arc::new(FakeSource::default());
        let state = state_with(source.clone());

        let first = mapping_handler(State(state.clone())).await.unwrap();
        let second = mapping_handler(State(state)).await.unwrap();

        assert_eq!(first.data[0].name, "Shark");
        assert_eq!(second.data.len(), 1);
        assert!(
            Arc::ptr_eq(&first.data, &second.data),
            "cached catalogue should be shared, not copied"
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mapping_handler_failure() {
        let source = Arc::new(FakeSource {
            fail: true,
            ..FakeSource::default()
        });
        let state = state_with(source.clone());

        let result = mapping_handler(State(state.clone())).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert!(mapping_handler(State(state)).await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prices_handler_filters_ids() {
        let state = state_with(Arc::new(FakeSource::default()));
        let query = PricesQuery {
            ids: Some("4151,999".to_string()),
            win: None,
        };

        let response = prices_handler(State(state), Query(query)).await.unwrap();
        assert_eq!(response.latest.len(), 1);
        assert!(response.latest.contains_key("4151"));
        assert_eq!(response.window.len(), 1);
    }

    #[tokio::test]
    async fn test_prices_handler_rejects_unknown_window() {
        let source = Arc::new(FakeSource::default());
        let state = state_with(source.clone());
        let query = PricesQuery {
            ids: None,
            win: Some("1w".to_string()),
        };

        let result = prices_handler(State(state), Query(query)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state_with(Arc::new(FakeSource::default()));
        let first = mapping_handler(State(state.clone())).await.unwrap();
        let second = mapping_handler(State(state.clone())).await.unwrap();
        assert_eq!(first.data, second.data);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.total_entries, 1);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_pick_without_filter_returns_all() {
        let rows = HashMap::from([("1".to_string(), 1), ("2".to_string(), 2)]);
        let no_ids: &[String] = &[];
        assert_eq!(pick(&rows, None), rows);
        assert!(pick(&rows, Some(no_ids)).is_empty());
    }
}
