//! Single-flight request coordination.
//!
//! The coordinator is a synchronous state machine. It hands out
//! [`PageRequest`]s and is told when they complete; it never performs I/O.
//!
//! ```text
//! Idle ──fetch_first_page──▶ Loading ──ok──▶ Ready ──fetch_next_page──▶ LoadingMore
//!                              │                ▲                          │
//!                              └─err─▶ Errored  └───────────ok─────────────┤
//!                                         │                                └─err─▶ ErroredMore
//!                                       retry ─▶ Loading                               │
//!                                                                        retry ─▶ LoadingMore
//! ```
//!
//! Only the most recently issued request may change state. Anything else
//! completing is stale and is dropped.

use lexlist_model::{
    ErrorInfo, ErrorScope, FetchError, FetchKind, FilterSchema, FilterSet, ListConfig, ListError,
    ListPhase, ListState, PageRequest, PaginationCursor, RequestId,
};
use lexlist_page::{AppendStats, ListAccumulator, ResponseInterpreter};
use serde_json::Value;

use crate::scroll::TriggerGate;

/// What a completion did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The page was merged into the list.
    Applied { kind: FetchKind, stats: AppendStats },
    /// The request failed; the error is now part of the list state.
    Failed(ErrorInfo),
    /// The request was superseded and its result dropped.
    Stale,
}

impl Completion {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Debug)]
pub struct RequestCoordinator {
    schema: FilterSchema,
    page_size: usize,
    interpreter: ResponseInterpreter,
    accumulator: ListAccumulator,
    phase: ListPhase,
    error: Option<ErrorInfo>,
    retry_count: u32,
    next_id: u64,
    /// The only request whose completion is still wanted.
    in_flight: Option<PageRequest>,
    /// Most recently issued request, re-issued by `retry`.
    last_request: Option<PageRequest>,
    /// Filters of the current list generation.
    filters: FilterSet,
}

impl RequestCoordinator {
    pub fn new(schema: FilterSchema, config: &ListConfig) -> Self {
        Self {
            schema,
            page_size: config.page_size,
            interpreter: ResponseInterpreter::new(config),
            accumulator: ListAccumulator::new(config.page_size),
            phase: ListPhase::Idle,
            error: None,
            retry_count: 0,
            next_id: 1,
            in_flight: None,
            last_request: None,
            filters: FilterSet::new(),
        }
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn in_flight(&self) -> Option<&PageRequest> {
        self.in_flight.as_ref()
    }

    pub fn accumulator(&self) -> &ListAccumulator {
        &self.accumulator
    }

    /// Gate consulted by the scroll trigger.
    ///
    /// Only a `Ready` list accepts signals, matching [`Self::fetch_next_page`].
    pub fn gate(&self) -> TriggerGate {
        TriggerGate {
            busy: self.phase != ListPhase::Ready,
            has_more: self.accumulator.has_more(),
        }
    }

    /// Start a fresh list for `filters`.
    ///
    /// Always issues a request; whatever was in flight becomes stale. The
    /// current items stay visible until the new page arrives.
    pub fn fetch_first_page(&mut self, filters: FilterSet) -> PageRequest {
        if let Some(previous) = &self.in_flight {
            tracing::debug!(superseded = %previous.id, "reset supersedes in-flight request");
        }
        self.filters = filters.clone();
        self.error = None;
        self.phase = ListPhase::Loading;
        self.issue(FetchKind::FirstPage, filters, PaginationCursor::None)
    }

    /// Request the page after the current cursor.
    ///
    /// `None` unless the list is `Ready` with a continuation.
    pub fn fetch_next_page(&mut self) -> Option<PageRequest> {
        if self.phase != ListPhase::Ready {
            tracing::trace!(phase = %self.phase, "next page not allowed");
            return None;
        }
        if !self.accumulator.has_more() || self.accumulator.cursor().is_none() {
            return None;
        }
        let cursor = self.accumulator.cursor().clone();
        self.phase = ListPhase::LoadingMore;
        Some(self.issue(FetchKind::NextPage, self.filters.clone(), cursor))
    }

    /// Re-issue the failed request with a new id.
    ///
    /// `None` unless the list is in an error phase.
    pub fn retry(&mut self) -> Option<PageRequest> {
        let phase = match self.phase {
            ListPhase::Errored => ListPhase::Loading,
            ListPhase::ErroredMore => ListPhase::LoadingMore,
            _ => return None,
        };
        let failed = self.last_request.clone()?;
        tracing::info!(retrying = %failed.id, kind = ?failed.kind, "retrying request");
        self.error = None;
        self.phase = phase;
        Some(self.issue(failed.kind, failed.filters, failed.cursor))
    }

    /// Record the outcome of request `id`.
    pub fn complete(&mut self, id: RequestId, result: Result<Value, FetchError>) -> Completion {
        let request = match self.in_flight.take_if(|r| r.id == id) {
            Some(request) => request,
            None => {
                let stale = ListError::StaleResultDiscarded { request_id: id };
                tracing::debug!("{stale}");
                return Completion::Stale;
            }
        };

        let page = result
            .map_err(ListError::from)
            .and_then(|raw| self.interpreter.interpret(&raw, &request));

        match request.kind {
            FetchKind::FirstPage => match page {
                Ok(page) => {
                    let stats = self.accumulator.reset(page);
                    self.phase = ListPhase::Ready;
                    self.error = None;
                    self.retry_count = 0;
                    tracing::info!(
                        request = %id,
                        items = self.accumulator.len(),
                        has_more = self.accumulator.has_more(),
                        "applied first page"
                    );
                    Completion::Applied {
                        kind: FetchKind::FirstPage,
                        stats,
                    }
                }
                Err(error) => {
                    self.accumulator.clear();
                    self.phase = ListPhase::Errored;
                    self.fail(&request, &error, ErrorScope::FirstPage)
                }
            },
            FetchKind::NextPage => match page.and_then(|page| self.accumulator.append(page)) {
                Ok(stats) => {
                    self.phase = ListPhase::Ready;
                    self.error = None;
                    tracing::info!(
                        request = %id,
                        added = stats.added,
                        replaced = stats.replaced,
                        has_more = self.accumulator.has_more(),
                        "appended page"
                    );
                    Completion::Applied {
                        kind: FetchKind::NextPage,
                        stats,
                    }
                }
                Err(error) => {
                    self.phase = ListPhase::ErroredMore;
                    self.retry_count += 1;
                    self.fail(&request, &error, ErrorScope::NextPage)
                }
            },
        }
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> ListState {
        ListState {
            phase: self.phase,
            items: self.accumulator.items().to_vec(),
            loading: self.phase == ListPhase::Loading,
            loading_more: self.phase == ListPhase::LoadingMore,
            error: self.error.clone(),
            has_more: self.accumulator.has_more(),
            cursor: self.accumulator.cursor().clone(),
            retry_count: self.retry_count,
            total: self.accumulator.total_count(),
        }
    }

    fn fail(&mut self, request: &PageRequest, error: &ListError, scope: ErrorScope) -> Completion {
        tracing::warn!(request = %request.id, kind = ?request.kind, "{error}");
        let info = ErrorInfo::from_error(error, scope);
        self.error = Some(info.clone());
        Completion::Failed(info)
    }

    fn issue(&mut self, kind: FetchKind, filters: FilterSet, cursor: PaginationCursor) -> PageRequest {
        let id = RequestId::new(self.next_id);
        self.next_id += 1;
        let request = PageRequest::new(id, kind, &self.schema, filters, cursor, self.page_size);
        tracing::debug!(request = %id, kind = ?kind, cursor = %request.cursor, "issuing request");
        self.in_flight = Some(request.clone());
        self.last_request = Some(request.clone());
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexlist_model::{ErrorKind, FilterField, TotalCount};
    use serde_json::json;

    fn coordinator(page_size: usize) -> RequestCoordinator {
        let schema = FilterSchema::new(vec![FilterField::select("court")]).unwrap();
        let config = ListConfig {
            page_size,
            ..Default::default()
        };
        RequestCoordinator::new(schema, &config)
    }

    fn relational_page(from: usize, count: usize, has_more: bool) -> Value {
        let items: Vec<Value> = (from..from + count)
            .map(|n| json!({"id": n, "title": format!("Judgment {n}")}))
            .collect();
        let last = from + count - 1;
        json!({
            "items": items,
            "has_more": has_more,
            "next_cursor": {"secondary_key": format!("2024-01-{:02}", last % 28 + 1), "id": last}
        })
    }

    #[test]
    fn test_relational_twenty_plus_twenty() {
        let mut coord = coordinator(20);
        let first = coord.fetch_first_page(FilterSet::new());
        assert!(coord.complete(first.id, Ok(relational_page(1, 20, true))).is_applied());

        let state = coord.snapshot();
        assert_eq!(state.items.len(), 20);
        assert!(state.has_more);
        assert_eq!(state.cursor, PaginationCursor::relational("2024-01-21", "20"));

        let next = coord.fetch_next_page().unwrap();
        assert_eq!(next.cursor, PaginationCursor::relational("2024-01-21", "20"));
        assert!(coord.complete(next.id, Ok(relational_page(21, 20, false))).is_applied());

        let state = coord.snapshot();
        assert_eq!(state.items.len(), 40);
        assert!(!state.has_more);
        assert_eq!(state.cursor, PaginationCursor::None);
        assert_eq!(state.total, TotalCount::Estimate(40));
        assert!(coord.fetch_next_page().is_none());
    }

    #[test]
    fn test_first_page_network_error_then_retry() {
        let mut coord = coordinator(20);
        let filters = FilterSet::new().with("court", "SC");
        let first = coord.fetch_first_page(filters.clone());
        let outcome = coord.complete(first.id, Err(FetchError::Network("offline".into())));

        let info = match outcome {
            Completion::Failed(info) => info,
            other => panic!("expected failure, got {other:?}"),
        };
        assert_eq!(info.scope, ErrorScope::FirstPage);
        assert_eq!(info.kind, Some(ErrorKind::Network));

        let state = coord.snapshot();
        assert!(state.items.is_empty());
        assert!(!state.loading);
        assert_eq!(state.phase, ListPhase::Errored);
        assert!(state.error.is_some());

        let retry = coord.retry().unwrap();
        assert!(retry.same_logical_request(&first));
        assert_ne!(retry.id, first.id);
        assert!(coord.snapshot().loading);
        assert!(coord.snapshot().error.is_none());

        assert!(coord.complete(retry.id, Ok(relational_page(1, 5, false))).is_applied());
        assert_eq!(coord.snapshot().items.len(), 5);
        assert_eq!(coord.snapshot().phase, ListPhase::Ready);
    }

    #[test]
    fn test_append_error_keeps_items_and_blocks_next_page() {
        let mut coord = coordinator(2);
        let first = coord.fetch_first_page(FilterSet::new());
        coord.complete(first.id, Ok(relational_page(1, 2, true)));

        let next = coord.fetch_next_page().unwrap();
        coord.complete(next.id, Err(FetchError::Network("reset".into())));

        let state = coord.snapshot();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.phase, ListPhase::ErroredMore);
        assert_eq!(state.retry_count, 1);
        assert_eq!(state.error.as_ref().map(|e| e.scope), Some(ErrorScope::NextPage));
        assert!(coord.fetch_next_page().is_none());
        assert!(coord.gate().busy);
        assert!(coord.gate().has_more);

        let retry = coord.retry().unwrap();
        assert!(retry.same_logical_request(&next));
        assert_eq!(coord.phase(), ListPhase::LoadingMore);
        assert!(coord.retry().is_none());
    }

    #[test]
    fn test_stale_completion_is_silent() {
        let mut coord = coordinator(2);
        let old = coord.fetch_first_page(FilterSet::new());
        let new = coord.fetch_first_page(FilterSet::new().with("court", "HC"));

        let outcome = coord.complete(old.id, Err(FetchError::Network("late".into())));
        assert_eq!(outcome, Completion::Stale);
        assert!(coord.snapshot().error.is_none());
        assert_eq!(coord.snapshot().retry_count, 0);
        assert_eq!(coord.phase(), ListPhase::Loading);

        assert!(coord.complete(new.id, Ok(relational_page(1, 1, false))).is_applied());
        // A duplicate completion for the same id is stale too.
        assert_eq!(
            coord.complete(new.id, Ok(relational_page(1, 1, false))),
            Completion::Stale
        );
    }

    #[test]
    fn test_kind_switch_on_append_is_an_inline_error() {
        let mut coord = coordinator(1);
        let first = coord.fetch_first_page(FilterSet::new());
        coord.complete(first.id, Ok(relational_page(1, 1, true)));

        let next = coord.fetch_next_page().unwrap();
        let outcome = coord.complete(
            next.id,
            Ok(json!({"items": [{"id": 9}], "search": {"engine": "es"}})),
        );
        assert!(matches!(outcome, Completion::Failed(ref info) if info.scope == ErrorScope::NextPage));
        assert_eq!(coord.snapshot().items.len(), 1);
    }

    #[test]
    fn test_next_page_requires_ready() {
        let mut coord = coordinator(2);
        assert!(coord.gate().busy);
        assert!(coord.fetch_next_page().is_none());
        coord.fetch_first_page(FilterSet::new());
        assert!(coord.fetch_next_page().is_none());
        assert!(coord.retry().is_none());
    }
}
