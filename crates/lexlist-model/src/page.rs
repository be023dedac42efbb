//! Interpreted page responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cursor::{PaginationCursor, PaginationKind};
use crate::item::{Highlights, Item};

/// Search-engine details attached to a search-backed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// Engine name reported by the backend (e.g. "opensearch").
    pub engine: Option<String>,
    /// Total number of matching documents.
    pub total_hits: Option<u64>,
    /// Best relevance score on the page.
    pub max_score: Option<f64>,
    /// Highlights keyed by item key, then field.
    pub highlights: BTreeMap<String, Highlights>,
}

/// One page of results after interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<Item>,
    pub has_more: bool,
    pub next_cursor: PaginationCursor,
    /// Pagination scheme the backend declared, `None` for a terminal page.
    pub kind: Option<PaginationKind>,
    /// Backend-supplied total, when it reports one.
    pub total: Option<u64>,
    pub search: Option<SearchMetadata>,
}

impl ResultPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
