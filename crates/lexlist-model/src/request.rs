//! Page requests handed to the host fetch function.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cursor::PaginationCursor;
use crate::filter::{FilterSchema, FilterSet};

/// Monotonic identifier of an issued request within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a request replaces the list or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Reset fetch for a (possibly new) filter set.
    FirstPage,
    /// Append fetch continuing from the list cursor.
    NextPage,
}

/// Everything a fetcher needs for one page, captured when the request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub id: RequestId,
    pub kind: FetchKind,
    pub filters: FilterSet,
    pub cursor: PaginationCursor,
    pub page_size: usize,
    /// Ask the backend for highlight fragments.
    pub highlight: bool,
}

impl PageRequest {
    /// Build a request, deriving the highlight flag from the schema.
    pub fn new(
        id: RequestId,
        kind: FetchKind,
        schema: &FilterSchema,
        filters: FilterSet,
        cursor: PaginationCursor,
        page_size: usize,
    ) -> Self {
        let highlight = schema.highlight_requested(&filters);
        Self {
            id,
            kind,
            filters,
            cursor,
            page_size,
            highlight,
        }
    }

    /// Same filters, cursor and size as `other`, ignoring the request id.
    pub fn same_logical_request(&self, other: &PageRequest) -> bool {
        self.kind == other.kind
            && self.filters == other.filters
            && self.cursor == other.cursor
            && self.page_size == other.page_size
            && self.highlight == other.highlight
    }

    /// Query parameters for a conventional GET endpoint.
    ///
    /// Only non-empty filters are included.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .filter_map(|(k, v)| v.to_query_value().map(|v| (k.to_string(), v)))
            .collect();
        pairs.push(("limit".to_string(), self.page_size.to_string()));
        pairs.extend(
            self.cursor
                .query_pairs()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v)),
        );
        if self.highlight {
            pairs.push(("highlight".to_string(), "true".to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterField;

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("q").with_highlight(),
            FilterField::select("court"),
        ])
        .unwrap()
    }

    #[test]
    fn test_query_pairs_skip_empty_filters() {
        let request = PageRequest::new(
            RequestId::new(1),
            FetchKind::NextPage,
            &schema(),
            FilterSet::new().with("court", "SC"),
            PaginationCursor::relational("2023-05-01", "881"),
            20,
        );
        assert!(!request.highlight);
        assert_eq!(
            request.query_pairs(),
            vec![
                ("court".to_string(), "SC".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("cursor_key".to_string(), "2023-05-01".to_string()),
                ("cursor_id".to_string(), "881".to_string()),
            ]
        );
    }

    #[test]
    fn test_highlight_flag_follows_schema() {
        let request = PageRequest::new(
            RequestId::new(2),
            FetchKind::FirstPage,
            &schema(),
            FilterSet::new().with("q", "bail"),
            PaginationCursor::None,
            10,
        );
        assert!(request.highlight);
        assert_eq!(
            request.query_pairs().last(),
            Some(&("highlight".to_string(), "true".to_string()))
        );
    }

    #[test]
    fn test_same_logical_request_ignores_id() {
        let a = PageRequest::new(
            RequestId::new(1),
            FetchKind::FirstPage,
            &schema(),
            FilterSet::new(),
            PaginationCursor::None,
            10,
        );
        let b = PageRequest {
            id: RequestId::new(9),
            ..a.clone()
        };
        assert!(a.same_logical_request(&b));
    }
}
