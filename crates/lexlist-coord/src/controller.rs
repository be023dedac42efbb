//! Async wiring of filter store, coordinator and scroll trigger.
//!
//! A `ListController` is meant for a single-threaded executor. State lives
//! in `RefCell`s; every borrow ends before the fetch is awaited, so several
//! operations on the same list may interleave freely.

use std::cell::RefCell;
use std::time::Instant;

use lexlist_filter::{FilterStore, History};
use lexlist_model::{FilterPatch, FilterSchema, FilterSet, ListConfig, ListState, PageRequest, Result};
use url::Url;

use crate::coordinator::{Completion, RequestCoordinator};
use crate::fetcher::PageFetcher;
use crate::scroll::{ScrollTrigger, SentinelId, TriggerDecision, ViewportSignal};

/// Result of feeding one viewport signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportOutcome {
    pub decision: TriggerDecision,
    /// Set when the decision led to a page load.
    pub completion: Option<Completion>,
}

/// One paginated, filterable list bound to a fetcher and a history.
pub struct ListController<F: PageFetcher, H: History> {
    fetcher: F,
    store: RefCell<FilterStore<H>>,
    coordinator: RefCell<RequestCoordinator>,
    trigger: RefCell<ScrollTrigger>,
}

impl<F: PageFetcher, H: History> ListController<F, H> {
    pub fn new(schema: FilterSchema, config: &ListConfig, history: H, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher,
            coordinator: RefCell::new(RequestCoordinator::new(schema.clone(), config)),
            store: RefCell::new(FilterStore::new(schema, config, history)),
            trigger: RefCell::new(ScrollTrigger::new(config)),
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load the first page for the filters in the current URL.
    pub async fn start(&self) -> Completion {
        self.fetch_first_page().await
    }

    /// Reload from the first page with the committed filters.
    pub async fn fetch_first_page(&self) -> Completion {
        let filters = self.store.borrow().get().clone();
        self.load(filters).await
    }

    /// Load the next page if the list allows it.
    pub async fn fetch_next_page(&self) -> Option<Completion> {
        let request = self.coordinator.borrow_mut().fetch_next_page()?;
        Some(self.run(request).await)
    }

    /// Re-issue the failed request.
    pub async fn retry(&self) -> Option<Completion> {
        let request = self.coordinator.borrow_mut().retry()?;
        Some(self.run(request).await)
    }

    /// Apply a user edit; reloads when the edit commits immediately.
    pub async fn set_filters(&self, patch: &FilterPatch, now: Instant) -> Result<Option<Completion>> {
        let committed = self.store.borrow_mut().set(patch, now)?;
        Ok(self.reload(committed).await)
    }

    pub fn focus(&self, key: &str) {
        self.store.borrow_mut().focus(key);
    }

    /// Input lost focus; a pending edit commits and reloads.
    pub async fn blur(&self) -> Option<Completion> {
        let committed = self.store.borrow_mut().blur();
        self.reload(committed).await
    }

    /// Drive timers: the filter debounce first, then any coalesced scroll signal.
    pub async fn tick(&self, now: Instant) -> Option<Completion> {
        let committed = self.store.borrow_mut().poll(now);
        if committed.is_some() {
            return self.reload(committed).await;
        }
        let gate = self.coordinator.borrow().gate();
        let decision = self.trigger.borrow_mut().flush_pending(now, gate)?;
        if decision == TriggerDecision::LoadMore {
            self.fetch_next_page().await
        } else {
            None
        }
    }

    /// Earliest instant at which [`ListController::tick`] has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        let debounce = self.store.borrow().next_deadline();
        let scroll = self.trigger.borrow().next_flush();
        match (debounce, scroll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Reset every filter to its default.
    pub async fn clear(&self) -> Option<Completion> {
        let committed = self.store.borrow_mut().clear();
        self.reload(committed).await
    }

    /// The URL changed through navigation; reload if the filters differ.
    pub async fn on_url_changed(&self) -> Option<Completion> {
        let committed = self.store.borrow_mut().on_url_changed();
        self.reload(committed).await
    }

    /// Mutate the history (e.g. back/forward) and react to the new URL.
    pub async fn navigate(&self, f: impl FnOnce(&mut H)) -> Option<Completion> {
        f(self.store.borrow_mut().history_mut());
        self.on_url_changed().await
    }

    pub fn attach_sentinel(&self, sentinel: SentinelId) {
        self.trigger.borrow_mut().attach(sentinel);
    }

    pub fn detach_sentinel(&self) {
        self.trigger.borrow_mut().detach();
    }

    /// Feed a viewport signal; loads the next page when the trigger fires.
    pub async fn on_viewport(&self, signal: ViewportSignal, now: Instant) -> ViewportOutcome {
        let gate = self.coordinator.borrow().gate();
        let decision = self.trigger.borrow_mut().evaluate(signal, now, gate);
        let completion = if decision == TriggerDecision::LoadMore {
            self.fetch_next_page().await
        } else {
            None
        };
        ViewportOutcome {
            decision,
            completion,
        }
    }

    pub fn snapshot(&self) -> ListState {
        self.coordinator.borrow().snapshot()
    }

    /// Committed filters.
    pub fn filters(&self) -> FilterSet {
        self.store.borrow().get().clone()
    }

    /// Input-layer filters, ahead of [`ListController::filters`] while typing.
    pub fn local_filters(&self) -> FilterSet {
        self.store.borrow().local().clone()
    }

    pub fn url(&self) -> Url {
        self.store.borrow().url().clone()
    }

    pub fn with_history<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(self.store.borrow().history())
    }

    async fn reload(&self, committed: Option<FilterSet>) -> Option<Completion> {
        Some(self.load(committed?).await)
    }

    async fn load(&self, filters: FilterSet) -> Completion {
        let request = self.coordinator.borrow_mut().fetch_first_page(filters);
        self.run(request).await
    }

    async fn run(&self, request: PageRequest) -> Completion {
        let result = self.fetcher.fetch(&request).await;
        self.coordinator.borrow_mut().complete(request.id, result)
    }
}
