//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::upstream::{UpstreamConfig, DEFAULT_API_BASE, DEFAULT_USER_AGENT};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in milliseconds for entries stored without an explicit TTL
    pub default_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds, 0 disables it
    pub cleanup_interval: u64,
    /// Prices API root
    pub api_base: String,
    /// User-Agent sent upstream
    pub user_agent: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// How long the item mapping stays cached, in milliseconds
    pub mapping_ttl_ms: u64,
    /// How long latest and window prices stay cached, in milliseconds
    pub prices_ttl_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 500)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 60000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds, 0 = off (default: 60)
    /// - `OSRS_API_BASE` - Prices API root (default: the OSRS Wiki)
    /// - `OSRS_USER_AGENT` - User-Agent header for upstream calls
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 10)
    /// - `MAPPING_TTL_MS` - Mapping cache TTL (default: 86400000, one day)
    /// - `PRICES_TTL_MS` - Latest/window cache TTL (default: 30000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES", defaults.max_entries),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval),
            api_base: env::var("OSRS_API_BASE").unwrap_or(defaults.api_base),
            user_agent: env::var("OSRS_USER_AGENT").unwrap_or(defaults.user_agent),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
            mapping_ttl_ms: parse_var("MAPPING_TTL_MS", defaults.mapping_ttl_ms),
            prices_ttl_ms: parse_var("PRICES_TTL_MS", defaults.prices_ttl_ms),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.api_base.clone(),
            user_agent: self.user_agent.clone(),
            timeout_secs: self.upstream_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 500,
            default_ttl_ms: 60_000,
            server_port: 3000,
            cleanup_interval: 60,
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            upstream_timeout: 10,
            mapping_ttl_ms: 24 * 60 * 60 * 1000,
            prices_ttl_ms: 30_000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
