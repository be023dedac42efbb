//! List configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ListError, Result};

/// How committed filters are written to browser history.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlWriteMode {
    /// New history entry per commit (back button walks filter changes).
    #[default]
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// Configuration for one paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Items requested per page.
    pub page_size: usize,

    /// Delay after the last keystroke before a text filter commits.
    pub debounce_ms: u64,

    /// How far below the viewport the sentinel counts as visible.
    pub root_margin_px: f64,

    /// Fraction of the sentinel that must be visible to load more.
    pub visibility_threshold: f64,

    /// Minimum interval between two scroll-trigger evaluations.
    pub throttle_ms: u64,

    /// Distance from the bottom at which the scroll fallback fires.
    pub scroll_fallback_px: f64,

    pub url_write_mode: UrlWriteMode,

    /// Payload fields combined into an identity key when items carry no id.
    pub fallback_key_fields: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            debounce_ms: 300,
            root_margin_px: 200.0,
            visibility_threshold: 0.1,
            throttle_ms: 150,
            scroll_fallback_px: 300.0,
            url_write_mode: UrlWriteMode::Push,
            fallback_key_fields: vec!["title".to_string(), "date".to_string()],
        }
    }
}

impl ListConfig {
    /// Check ranges that would otherwise stall or spin the list.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ListError::InvalidConfig {
                field: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(ListError::InvalidConfig {
                field: "visibility_threshold",
                reason: format!("must be in (0, 1], got {}", self.visibility_threshold),
            });
        }
        if self.root_margin_px < 0.0 || !self.root_margin_px.is_finite() {
            return Err(ListError::InvalidConfig {
                field: "root_margin_px",
                reason: "must be a non-negative number".to_string(),
            });
        }
        if self.scroll_fallback_px < 0.0 || !self.scroll_fallback_px.is_finite() {
            return Err(ListError::InvalidConfig {
                field: "scroll_fallback_px",
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}
