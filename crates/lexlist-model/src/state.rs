//! Read-only list state exposed to the rendering layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cursor::PaginationCursor;
use crate::error::{ErrorKind, ListError};
use crate::item::Item;

// =============================================================================
// PHASE
// =============================================================================

/// Lifecycle of one logical list.
///
/// ```text
/// Idle -> Loading -> Ready | Errored
/// Ready -> LoadingMore -> Ready | ErroredMore
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored,
    LoadingMore,
    ErroredMore,
}

impl ListPhase {
    /// Whether a request is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }

    pub fn is_errored(self) -> bool {
        matches!(self, Self::Errored | Self::ErroredMore)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Errored => "errored",
            Self::LoadingMore => "loading more",
            Self::ErroredMore => "errored (more)",
        }
    }
}

impl fmt::Display for ListPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERROR INFO
// =============================================================================

/// Which fetch an error belongs to, deciding how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorScope {
    /// Full-panel error; the list was cleared.
    FirstPage,
    /// Inline error under the existing items.
    NextPage,
}

/// User-visible failure with its single retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub scope: ErrorScope,
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
    /// Human-readable message.
    pub message: String,
    pub suggestion: Option<String>,
    /// Technical detail for logs and bug reports.
    pub detail: String,
}

impl ErrorInfo {
    pub fn from_error(error: &ListError, scope: ErrorScope) -> Self {
        Self {
            scope,
            kind: Some(error.kind()),
            message: error.user_message(),
            suggestion: error.suggestion(),
            detail: error.to_string(),
        }
    }
}

// =============================================================================
// TOTAL COUNT
// =============================================================================

/// Total number of results, exact only when the backend reported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TotalCount {
    Exact(u64),
    /// Loaded items plus one page when more are available.
    Estimate(u64),
}

impl TotalCount {
    pub fn value(self) -> u64 {
        match self {
            Self::Exact(n) | Self::Estimate(n) => n,
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

impl Default for TotalCount {
    fn default() -> Self {
        Self::Estimate(0)
    }
}

impl fmt::Display for TotalCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Estimate(n) => write!(f, "~{n}"),
        }
    }
}

// =============================================================================
// LIST STATE
// =============================================================================

/// Snapshot of one list for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListState {
    pub phase: ListPhase,
    pub items: Vec<Item>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<ErrorInfo>,
    pub has_more: bool,
    pub cursor: PaginationCursor,
    pub retry_count: u32,
    pub total: TotalCount,
}

impl ListState {
    /// Short "shown of total" line, e.g. `20 of ~40`.
    pub fn summary(&self) -> String {
        format!("{} of {}", self.items.len(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_display_marks_estimates() {
        assert_eq!(TotalCount::Exact(57).to_string(), "57");
        assert_eq!(TotalCount::Estimate(40).to_string(), "~40");
    }

    #[test]
    fn test_error_info_from_network_error() {
        let error = ListError::Network {
            message: "timed out".into(),
        };
        let info = ErrorInfo::from_error(&error, ErrorScope::FirstPage);
        assert_eq!(info.kind, Some(ErrorKind::Network));
        assert!(!info.message.is_empty());
        assert!(info.suggestion.is_some());
        assert_eq!(info.detail, "Network request failed: timed out");
    }

    #[test]
    fn test_phase_busy() {
        assert!(ListPhase::Loading.is_busy());
        assert!(ListPhase::LoadingMore.is_busy());
        assert!(!ListPhase::ErroredMore.is_busy());
        assert!(ListPhase::ErroredMore.is_errored());
    }
}
