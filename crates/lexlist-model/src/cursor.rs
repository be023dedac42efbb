//! Pagination resume points.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which pagination scheme a backend answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationKind {
    /// Naturally ordered store paged by `(secondary key, id)`.
    Relational,
    /// Relevance-ranked search index paged by hit offset.
    Search,
}

impl PaginationKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for PaginationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the next page resumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaginationCursor {
    /// Initial state, or nothing further to load.
    #[default]
    None,
    /// Composite resume point for ordered stores (e.g. judgment date + id).
    Relational { secondary_key: String, id: String },
    /// Number of hits already returned by the search index.
    SearchOffset { offset: u64 },
}

impl PaginationCursor {
    pub fn relational(secondary_key: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Relational {
            secondary_key: secondary_key.into(),
            id: id.into(),
        }
    }

    pub fn search(offset: u64) -> Self {
        Self::SearchOffset { offset }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Pagination scheme this cursor belongs to.
    pub fn kind(&self) -> Option<PaginationKind> {
        match self {
            Self::None => None,
            Self::Relational { .. } => Some(PaginationKind::Relational),
            Self::SearchOffset { .. } => Some(PaginationKind::Search),
        }
    }

    /// Search offset to request from, zero for anything but a search cursor.
    pub fn offset(&self) -> u64 {
        match self {
            Self::SearchOffset { offset } => *offset,
            _ => 0,
        }
    }

    /// Query parameters that continue from this cursor.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::None => Vec::new(),
            Self::Relational { secondary_key, id } => vec![
                ("cursor_key", secondary_key.clone()),
                ("cursor_id", id.clone()),
            ],
            Self::SearchOffset { offset } => vec![("offset", offset.to_string())],
        }
    }
}

impl fmt::Display for PaginationCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Relational { secondary_key, id } => write!(f, "after {secondary_key}/{id}"),
            Self::SearchOffset { offset } => write!(f, "offset {offset}"),
        }
    }
}
