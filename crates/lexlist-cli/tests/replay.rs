//! End-to-end replays of recorded responses.

use lexlist_cli::profile::ListProfile;
use lexlist_cli::replay::{
    FixtureFetcher, ReplayOptions, describe_filters, inspect, replay, request_query,
};
use lexlist_model::{FilterPatch, ListPhase, PaginationCursor, PaginationKind, TotalCount};
use serde_json::{Value, json};
use url::Url;

fn profile(page_size: usize) -> ListProfile {
    let mut profile = ListProfile::default();
    profile.config.page_size = page_size;
    profile
}

fn options(filters: FilterPatch, scrolls: usize) -> ReplayOptions {
    ReplayOptions {
        url: Url::parse("https://example.test/judgments?tab=sc").unwrap(),
        filters,
        scrolls,
    }
}

fn judgments(from: u64, count: u64, has_more: bool) -> Value {
    let items: Vec<Value> = (from..from + count)
        .map(|n| json!({"id": n, "title": format!("Judgment {n}"), "date": "2024-02-01"}))
        .collect();
    json!({
        "items": items,
        "has_more": has_more,
        "next_cursor": {"date": "2024-02-01", "id": from + count - 1}
    })
}

fn hits(from: u64, count: u64, total_hits: u64) -> Value {
    let items: Vec<Value> = (from..from + count)
        .map(|n| {
            json!({
                "_id": format!("doc-{n}"),
                "title": format!("Bail order {n}"),
                "_highlight": {"title": format!("<em>Bail</em> order {n}")}
            })
        })
        .collect();
    json!({
        "results": items,
        "search": {"engine": "opensearch", "total_hits": total_hits}
    })
}

fn queries(report: &lexlist_cli::replay::ReplayReport) -> String {
    report
        .requests
        .iter()
        .map(request_query)
        .collect::<Vec<_>>()
        .join("\n")
}

fn outcomes(report: &lexlist_cli::replay::ReplayReport) -> String {
    report
        .steps
        .iter()
        .map(|step| format!("{}: {}", step.action, step.outcome))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn relational_list_scrolls_until_exhausted() {
    let profile = profile(2);
    let fetcher = FixtureFetcher::new(vec![
        judgments(1, 2, true),
        judgments(3, 2, true),
        judgments(5, 1, false),
    ]);
    let filters = FilterPatch::new().with("court", "SC");

    let report = replay(&profile, fetcher, options(filters, 10)).await.unwrap();

    assert_eq!(
        report.url.as_str(),
        "https://example.test/judgments?tab=sc&court=SC"
    );
    assert_eq!(describe_filters(&profile.filters, &report.filters), "court=SC");
    insta::assert_snapshot!(queries(&report), @r"
    court=SC&limit=2
    court=SC&limit=2&cursor_key=2024-02-01&cursor_id=2
    court=SC&limit=2&cursor_key=2024-02-01&cursor_id=4
    ");
    insta::assert_snapshot!(outcomes(&report), @r"
    load first page: loaded 2
    scroll #1: appended 2
    scroll #2: appended 1
    scroll #3: exhausted
    ");
    assert_eq!(report.state.phase, ListPhase::Ready);
    assert_eq!(report.state.items.len(), 5);
    assert!(!report.state.has_more);
    assert_eq!(report.state.total, TotalCount::Estimate(5));
    assert_eq!(report.unused_pages, 0);
}

#[tokio::test]
async fn text_filter_commits_on_blur_and_requests_highlights() {
    let profile = profile(2);
    let fetcher = FixtureFetcher::new(vec![hits(1, 2, 3), hits(3, 1, 3)]);
    let filters = FilterPatch::new().with("q", "bail");

    let report = replay(&profile, fetcher, options(filters, 3)).await.unwrap();

    assert_eq!(
        report.url.as_str(),
        "https://example.test/judgments?tab=sc&q=bail"
    );
    insta::assert_snapshot!(queries(&report), @r"
    q=bail&limit=2&highlight=true
    q=bail&limit=2&offset=2&highlight=true
    ");
    assert_eq!(report.state.items.len(), 3);
    assert_eq!(report.state.total, TotalCount::Exact(3));
    assert_eq!(report.state.cursor, PaginationCursor::None);
    assert_eq!(
        report.state.items[0].highlights["title"],
        vec!["<em>Bail</em> order 1".to_string()]
    );
}

#[tokio::test]
async fn running_out_of_pages_surfaces_a_retryable_error() {
    let profile = profile(2);
    let fetcher = FixtureFetcher::new(vec![judgments(1, 2, true)]);

    let report = replay(&profile, fetcher, options(FilterPatch::new(), 1))
        .await
        .unwrap();

    assert_eq!(report.state.phase, ListPhase::ErroredMore);
    assert_eq!(report.state.items.len(), 2);
    assert_eq!(report.state.retry_count, 1);
    let error = report.state.error.as_ref().unwrap();
    assert!(error.detail.contains("no more recorded pages"), "{error:?}");
    assert!(report.steps[1].outcome.starts_with("failed"));
}

#[test]
fn fixture_document_must_be_an_array() {
    assert!(FixtureFetcher::from_json(json!({"items": []})).is_err());
    assert!(FixtureFetcher::from_json(json!([])).is_ok());
}

#[test]
fn inspect_interprets_a_search_page_at_an_offset() {
    let page = inspect(&profile(2), &hits(41, 2, 57), 2, 40).unwrap();
    assert_eq!(page.kind, Some(PaginationKind::Search));
    assert_eq!(page.next_cursor, PaginationCursor::search(42));
    assert_eq!(page.total, Some(57));
    assert!(page.has_more);
}

#[test]
fn inspect_rejects_non_object_responses() {
    let err = inspect(&profile(2), &json!([1, 2]), 2, 0).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("got an array"), "{text}");
}
