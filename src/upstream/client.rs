//! OSRS Wiki Prices Client
//!
//! reqwest-backed [`PriceSource`] for the three read endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::UpstreamError;
use crate::upstream::{LatestResponse, MappingRow, PriceSource, Window, WindowResponse};

pub const DEFAULT_API_BASE: &str = "https://prices.runescape.wiki/api/v1";
pub const DEFAULT_USER_AGENT: &str = "osrs-price-monitor/0.1 (no-contact-provided)";

// == Upstream Config ==
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// API root, without the `/osrs` segment
    pub base_url: String,
    /// The wiki asks every client to identify itself
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

// == OSRS Client ==
#[derive(Debug, Clone)]
pub struct OsrsClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OsrsClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| UpstreamError::Request {
                endpoint: "client".to_string(),
                source,
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, UpstreamError> {
        let url = format!("{}/osrs/{}", self.base_url, endpoint);
        debug!(%url, "fetching upstream");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| UpstreamError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

#[async_trait]
impl PriceSource for OsrsClient {
    #[instrument(skip(self))]
    async fn fetch_mapping(&self) -> Result<Vec<MappingRow>, UpstreamError> {
        self.get_json("mapping").await
    }

    #[instrument(skip(self))]
    async fn fetch_latest(&self) -> Result<LatestResponse, UpstreamError> {
        self.get_json("latest").await
    }

    #[instrument(skip(self))]
    async fn fetch_window(&self, window: Window) -> Result<WindowResponse, UpstreamError> {
        self.get_json(window.as_str()).await
    }
}
