//! Shared fixtures for controller tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::future::Future;

use lexlist_coord::{ListController, PageFetcher};
use lexlist_filter::MemoryHistory;
use lexlist_model::{FetchError, FilterField, FilterSchema, ListConfig, PageRequest, RequestId};
use serde_json::{Value, json};
use tokio::sync::oneshot;
use url::Url;

type Reply = Result<Value, FetchError>;

/// Fetcher whose responses are supplied by the test, in any order.
#[derive(Default)]
pub struct ScriptedFetcher {
    requests: RefCell<Vec<PageRequest>>,
    pending: RefCell<Vec<(RequestId, oneshot::Sender<Reply>)>>,
}

impl ScriptedFetcher {
    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.borrow().clone()
    }

    pub fn pending_ids(&self) -> Vec<RequestId> {
        self.pending.borrow().iter().map(|(id, _)| *id).collect()
    }

    /// Yield until at least `count` calls are awaiting a reply.
    pub async fn wait_for_pending(&self, count: usize) {
        while self.pending.borrow().len() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Answer request `id`. Panics if it is not pending.
    pub fn respond(&self, id: RequestId, reply: Reply) {
        let mut pending = self.pending.borrow_mut();
        let pos = pending
            .iter()
            .position(|(pending_id, _)| *pending_id == id)
            .unwrap_or_else(|| panic!("request {id} is not pending"));
        let (_, sender) = pending.remove(pos);
        let _ = sender.send(reply);
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Reply> {
        let (tx, rx) = oneshot::channel();
        self.requests.borrow_mut().push(request.clone());
        self.pending.borrow_mut().push((request.id, tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(FetchError::Network("request dropped".into())))
        }
    }
}

pub fn schema() -> FilterSchema {
    FilterSchema::new(vec![
        FilterField::text("q").with_highlight(),
        FilterField::select("court"),
        FilterField::number("year"),
    ])
    .unwrap()
}

pub fn config(page_size: usize) -> ListConfig {
    ListConfig {
        page_size,
        ..Default::default()
    }
}

pub fn controller(
    url: &str,
    page_size: usize,
) -> ListController<ScriptedFetcher, MemoryHistory> {
    let history = MemoryHistory::new(Url::parse(url).unwrap());
    ListController::new(schema(), &config(page_size), history, ScriptedFetcher::default()).unwrap()
}

/// Relational page of judgments `from..from + count`.
pub fn relational_page(from: u64, count: u64, has_more: bool) -> Value {
    let items: Vec<Value> = (from..from + count)
        .map(|n| json!({"id": n, "title": format!("Judgment {n}"), "date": "2024-02-01"}))
        .collect();
    json!({
        "items": items,
        "has_more": has_more,
        "next_cursor": {"date": "2024-02-01", "id": from + count - 1}
    })
}

/// Search page of hits `from..from + count` with a title highlight each.
pub fn search_page(from: u64, count: u64, total_hits: u64) -> Value {
    let items: Vec<Value> = (from..from + count)
        .map(|n| {
            json!({
                "_id": format!("doc-{n}"),
                "title": format!("Act {n}"),
                "_highlight": {"title": format!("<em>Act</em> {n}")}
            })
        })
        .collect();
    json!({
        "results": items,
        "search": {"engine": "opensearch", "total_hits": total_hits, "max_score": 7.25}
    })
}
