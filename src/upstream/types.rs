//! Upstream Record Types
//!
//! Payload shapes returned by the OSRS Wiki prices API.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Static metadata for one tradeable item (`/osrs/mapping`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRow {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<bool>,
    /// Grand Exchange buy limit per four hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highalch: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowalch: Option<u64>,
    /// Icon file name relative to the wiki
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Most recent instant-buy and instant-sell trade for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrice {
    pub high: Option<u64>,
    pub high_time: Option<i64>,
    pub low: Option<u64>,
    pub low_time: Option<i64>,
}

/// `/osrs/latest` body, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestResponse {
    pub data: HashMap<String, LatestPrice>,
}

/// Averages over one window for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRow {
    pub avg_high_price: Option<u64>,
    pub avg_low_price: Option<u64>,
    pub high_price_volume: Option<u64>,
    pub low_price_volume: Option<u64>,
}

/// `/osrs/{5m,1h,24h}` body, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowResponse {
    pub data: HashMap<String, WindowRow>,
    /// Start of the window in Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

// == Window ==
/// Averaging period for windowed prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    OneDay,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::FiveMinutes => "5m",
            Window::OneHour => "1h",
            Window::OneDay => "24h",
        }
    }

    /// Cache key under which this window's response is memoized.
    pub fn cache_key(&self) -> String {
        format!("win:{}", self.as_str())
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Window::FiveMinutes),
            "1h" => Ok(Window::OneHour),
            "24h" => Ok(Window::OneDay),
            other => Err(format!("unknown window '{other}', expected one of 5m, 1h, 24h")),
        }
    }
}
