//! Replaying recorded backend responses through a list controller.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use lexlist_coord::{
    Completion, ListController, PageFetcher, ScrollMetrics, SentinelId, TriggerDecision,
    ViewportSignal,
};
use lexlist_filter::MemoryHistory;
use lexlist_model::{
    FetchError, FetchKind, FilterPatch, FilterSchema, FilterSet, ListState, PageRequest,
    PaginationCursor, RequestId, ResultPage,
};
use lexlist_page::ResponseInterpreter;
use serde_json::Value;
use tracing::{debug, info};
use url::{Url, form_urlencoded};

use crate::profile::ListProfile;

/// Assumed rendered height of one item when simulating scrolling.
const ROW_HEIGHT_PX: f64 = 80.0;
const VIEWPORT_HEIGHT_PX: f64 = 800.0;

// =============================================================================
// FIXTURE FETCHER
// =============================================================================

/// Serves recorded pages in order, one per request.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: RefCell<VecDeque<Value>>,
    requests: RefCell<Vec<PageRequest>>,
}

impl FixtureFetcher {
    pub fn new(pages: Vec<Value>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Build from a JSON document holding an array of responses.
    pub fn from_json(document: Value) -> Result<Self> {
        match document {
            Value::Array(pages) => Ok(Self::new(pages)),
            _ => bail!("recorded pages must be a JSON array of responses"),
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.pages.borrow().len()
    }
}

impl PageFetcher for FixtureFetcher {
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<Value, FetchError>> {
        self.requests.borrow_mut().push(request.clone());
        let next = self.pages.borrow_mut().pop_front();
        debug!(request = %request.id, served = next.is_some(), "fixture fetch");
        async move { next.ok_or_else(|| FetchError::Network("no more recorded pages".into())) }
    }
}

// =============================================================================
// INSPECT
// =============================================================================

/// Interpret one recorded response as if it answered a first-page request.
pub fn inspect(
    profile: &ListProfile,
    response: &Value,
    page_size: usize,
    offset: u64,
) -> Result<ResultPage> {
    let cursor = if offset > 0 {
        PaginationCursor::search(offset)
    } else {
        PaginationCursor::None
    };
    let request = PageRequest::new(
        RequestId::new(1),
        FetchKind::FirstPage,
        &profile.filters,
        FilterSet::new(),
        cursor,
        page_size,
    );
    let interpreter = ResponseInterpreter::new(&profile.config);
    interpreter
        .interpret(response, &request)
        .map_err(|e| {
            let message = e.user_message();
            anyhow::Error::new(e).context(message)
        })
}

// =============================================================================
// REPLAY
// =============================================================================

/// Inputs of a replay run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub url: Url,
    pub filters: FilterPatch,
    /// Number of scroll-to-bottom gestures to simulate.
    pub scrolls: usize,
}

/// One step of a replay, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    pub action: String,
    pub outcome: String,
}

/// Everything a replay produced.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub url: Url,
    pub filters: FilterSet,
    pub state: ListState,
    pub requests: Vec<PageRequest>,
    pub steps: Vec<ReplayStep>,
    /// Recorded pages never requested.
    pub unused_pages: usize,
}

/// Drive a list controller against recorded pages.
#[tracing::instrument(name = "replay", skip_all, fields(url = %options.url))]
pub async fn replay(
    profile: &ListProfile,
    fetcher: FixtureFetcher,
    options: ReplayOptions,
) -> Result<ReplayReport> {
    let history = MemoryHistory::new(options.url);
    let list = ListController::new(profile.filters.clone(), &profile.config, history, fetcher)
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
    let mut steps = Vec::new();
    let t0 = Instant::now();

    let first = if options.filters.is_empty() {
        None
    } else {
        let committed = list
            .set_filters(&options.filters, t0)
            .await
            .context("apply filters")?;
        match committed {
            Some(completion) => Some(completion),
            None => list.blur().await,
        }
    };
    let first = match first {
        Some(completion) => completion,
        None => list.start().await,
    };
    steps.push(ReplayStep {
        action: "load first page".to_string(),
        outcome: describe(&first),
    });

    list.attach_sentinel(SentinelId(1));
    let throttle = Duration::from_millis(profile.config.throttle_ms + 1);
    let mut now = t0;
    for n in 1..=options.scrolls {
        now += throttle;
        let signal = scrolled_to_bottom(list.snapshot().items.len());
        let outcome = list.on_viewport(signal, now).await;
        let text = match (&outcome.decision, &outcome.completion) {
            (_, Some(completion)) => describe(completion),
            (decision, None) => format!("{decision:?}").to_lowercase(),
        };
        steps.push(ReplayStep {
            action: format!("scroll #{n}"),
            outcome: text,
        });
        if outcome.decision == TriggerDecision::Exhausted {
            info!(scrolls = n, "list exhausted");
            break;
        }
    }

    let fetcher = list.fetcher();
    Ok(ReplayReport {
        url: list.url(),
        filters: list.filters(),
        state: list.snapshot(),
        requests: fetcher.requests(),
        unused_pages: fetcher.remaining(),
        steps,
    })
}

/// Scroll metrics for a viewport pinned to the bottom of `items` rows.
fn scrolled_to_bottom(items: usize) -> ViewportSignal {
    let scroll_height = items as f64 * ROW_HEIGHT_PX;
    ViewportSignal::Scroll(ScrollMetrics {
        scroll_top: (scroll_height - VIEWPORT_HEIGHT_PX).max(0.0),
        client_height: VIEWPORT_HEIGHT_PX,
        scroll_height,
    })
}

fn describe(completion: &Completion) -> String {
    match completion {
        Completion::Applied { kind, stats } => {
            let verb = match kind {
                FetchKind::FirstPage => "loaded",
                FetchKind::NextPage => "appended",
            };
            if stats.replaced > 0 {
                format!("{verb} {} ({} replaced)", stats.added, stats.replaced)
            } else {
                format!("{verb} {}", stats.added)
            }
        }
        Completion::Failed(info) => format!("failed: {}", info.detail),
        Completion::Stale => "stale".to_string(),
    }
}

/// Query-string form of a request, as a GET endpoint would receive it.
pub fn request_query(request: &PageRequest) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(request.query_pairs())
        .finish()
}

/// Filters rendered in schema order as `key=value` pairs.
pub fn describe_filters(schema: &FilterSchema, filters: &FilterSet) -> String {
    let parts: Vec<String> = schema
        .fields()
        .iter()
        .filter(|f| !filters.get(&f.key).is_empty())
        .map(|f| format!("{}={}", f.key, filters.get(&f.key)))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}
