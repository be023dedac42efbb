//! Response interpretation.
//!
//! Turns a raw backend payload into a [`ResultPage`], deciding once per
//! response which pagination scheme the backend used.

use std::collections::BTreeMap;

use lexlist_model::{
    Highlights, Item, ItemKey, ListConfig, ListError, PageRequest, PaginationCursor,
    PaginationKind, Result, ResultPage, SearchMetadata,
};
use serde_json::{Map, Value};

use crate::highlight::{self, INLINE_HIGHLIGHT_KEYS};
use crate::raw::{RawEnvelope, RawSearch, json_type, scalar_string};

/// Decide the pagination scheme of a response.
///
/// Search metadata wins over a cursor object; a response with neither is
/// terminal.
pub(crate) fn classify(envelope: &RawEnvelope) -> Option<PaginationKind> {
    if envelope.has_search_metadata() {
        Some(PaginationKind::Search)
    } else if envelope.next_cursor.is_some() {
        Some(PaginationKind::Relational)
    } else {
        None
    }
}

/// Interprets raw responses for one list.
#[derive(Debug, Clone, Default)]
pub struct ResponseInterpreter {
    fallback_key_fields: Vec<String>,
}

impl ResponseInterpreter {
    pub fn new(config: &ListConfig) -> Self {
        Self {
            fallback_key_fields: config.fallback_key_fields.clone(),
        }
    }

    /// Interpret `raw` as the answer to `request`.
    pub fn interpret(&self, raw: &Value, request: &PageRequest) -> Result<ResultPage> {
        let mut envelope = RawEnvelope::from_value(raw)?;
        let kind = classify(&envelope);

        let raw_items = envelope
            .items
            .take()
            .ok_or_else(|| ListError::malformed("no item array under items, results or data"))?;

        let raw_search = envelope.search.take();
        let next_offset = raw_search.as_ref().and_then(|s| s.next_offset);
        let search = match kind {
            Some(PaginationKind::Search) => Some(search_metadata(
                raw_search,
                envelope.engine.take(),
                envelope.max_score,
            )?),
            _ => None,
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for (idx, raw_item) in raw_items.into_iter().enumerate() {
            let payload = match raw_item {
                Value::Object(payload) => payload,
                other => {
                    return Err(ListError::malformed(format!(
                        "item {idx} must be an object, got {}",
                        json_type(&other)
                    )));
                }
            };
            let mut item = self.item(payload)?;
            if let Some(extra) = search
                .as_ref()
                .and_then(|s| s.highlights.get(item.key.as_str()))
            {
                highlight::overlay(&mut item.highlights, extra.clone());
            }
            items.push(item);
        }

        let has_more = match kind {
            None => {
                if envelope.has_more == Some(true) {
                    tracing::warn!(
                        request = %request.id,
                        "response reports more results but carries no continuation"
                    );
                }
                false
            }
            Some(PaginationKind::Search) if items.is_empty() => false,
            Some(_) => envelope
                .has_more
                .unwrap_or(items.len() >= request.page_size),
        };

        let next_cursor = match (kind, has_more) {
            (_, false) | (None, _) => PaginationCursor::None,
            (Some(PaginationKind::Relational), true) => match envelope.next_cursor.take() {
                Some(cursor) => cursor.into_cursor()?,
                None => PaginationCursor::None,
            },
            (Some(PaginationKind::Search), true) => {
                let next =
                    next_offset.unwrap_or(request.cursor.offset() + items.len() as u64);
                PaginationCursor::search(next)
            }
        };

        let total = envelope
            .total
            .or_else(|| search.as_ref().and_then(|s| s.total_hits));

        tracing::debug!(
            request = %request.id,
            kind = kind.map_or("terminal", PaginationKind::name),
            items = items.len(),
            has_more,
            cursor = %next_cursor,
            "interpreted page"
        );

        Ok(ResultPage {
            items,
            has_more,
            next_cursor,
            kind,
            total,
            search,
        })
    }

    fn item(&self, mut payload: Map<String, Value>) -> Result<Item> {
        let mut highlights = Highlights::new();
        for key in INLINE_HIGHLIGHT_KEYS {
            if let Some(raw) = payload.remove(key) {
                highlight::overlay(&mut highlights, highlight::normalize(&raw)?);
            }
        }
        let key = self.item_key(&payload);
        Ok(Item {
            key,
            payload: Value::Object(payload),
            highlights,
        })
    }

    /// Backend id, else a composite of the fallback fields, else the payload.
    fn item_key(&self, payload: &Map<String, Value>) -> ItemKey {
        if let Some(id) = ["id", "_id"]
            .iter()
            .find_map(|k| payload.get(*k).and_then(scalar_string))
        {
            return ItemKey::new(id);
        }

        let parts: Vec<String> = self
            .fallback_key_fields
            .iter()
            .filter_map(|field| {
                payload
                    .get(field)
                    .and_then(scalar_string)
                    .map(|v| format!("{field}={v}"))
            })
            .collect();
        if !parts.is_empty() {
            return ItemKey::new(parts.join("|"));
        }

        // serde_json maps are sorted, so this is stable for equal payloads.
        ItemKey::new(Value::Object(payload.clone()).to_string())
    }
}

/// Merge the `search` block with top-level engine markers.
fn search_metadata(
    raw: Option<RawSearch>,
    engine: Option<String>,
    max_score: Option<f64>,
) -> Result<SearchMetadata> {
    let raw = raw.unwrap_or_default();
    let mut highlights = BTreeMap::new();
    if let Some(by_item) = &raw.highlights {
        for (key, value) in by_item {
            highlights.insert(key.clone(), highlight::normalize(value)?);
        }
    }
    Ok(SearchMetadata {
        engine: raw.engine.or(engine),
        total_hits: raw.total_hits,
        max_score: raw.max_score.or(max_score),
        highlights,
    })
}
