//! Upstream Module
//!
//! Access to the OSRS Wiki real-time prices API.
//!
//! # Endpoints
//! - `GET /osrs/mapping` - Item metadata, refreshed daily
//! - `GET /osrs/latest` - Latest high/low trade per item
//! - `GET /osrs/{5m,1h,24h}` - Windowed average prices and volumes

mod client;
mod types;

use async_trait::async_trait;

use crate::error::UpstreamError;

pub use client::{OsrsClient, UpstreamConfig, DEFAULT_API_BASE, DEFAULT_USER_AGENT};
pub use types::{LatestPrice, LatestResponse, MappingRow, Window, WindowResponse, WindowRow};

// == Price Source ==
/// Read side of the prices API; handlers depend on this, not on reqwest.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_mapping(&self) -> Result<Vec<MappingRow>, UpstreamError>;

    async fn fetch_latest(&self) -> Result<LatestResponse, UpstreamError>;

    async fn fetch_window(&self, window: Window) -> Result<WindowResponse, UpstreamError>;
}
