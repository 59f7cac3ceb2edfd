//! Request DTOs for the price API
//!
//! Query-string shapes accepted by the handlers.

use serde::Deserialize;

use crate::upstream::Window;

/// Query for `GET /api/prices`
///
/// # Fields
/// - `ids`: Optional comma-separated item ids, e.g. `4151,11840`
/// - `win`: Optional averaging window (`5m`, `1h`, `24h`), default `1h`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricesQuery {
    #[serde(default)]
    pub ids: Option<String>,
    #[serde(default)]
    pub win: Option<String>,
}

impl PricesQuery {
    /// Item ids to keep, or `None` to return every item.
    ///
    /// Blank segments are dropped; a parameter with no ids at all selects
    /// nothing.
    pub fn item_ids(&self) -> Option<Vec<String>> {
        self.ids.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    /// Parses `win`, defaulting to one hour.
    pub fn window(&self) -> Result<Window, String> {
        match self.win.as_deref() {
            None | Some("") => Ok(Window::default()),
            Some(raw) => raw.parse(),
        }
    }
}
