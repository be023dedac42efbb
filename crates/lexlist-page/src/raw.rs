//! Wire shapes accepted from list backends.
//!
//! Field aliases cover the envelope variants seen across endpoints
//! (`items`/`results`/`data`, snake and camel case flags).

use lexlist_model::{ListError, PaginationCursor, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Response envelope before interpretation.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(alias = "results", alias = "data")]
    pub items: Option<Vec<Value>>,

    #[serde(alias = "hasMore")]
    pub has_more: Option<bool>,

    #[serde(alias = "nextCursor")]
    pub next_cursor: Option<RawCursor>,

    #[serde(alias = "total_count")]
    pub total: Option<u64>,

    pub search: Option<RawSearch>,

    /// Top-level engine marker used by flat search responses.
    #[serde(alias = "search_engine")]
    pub engine: Option<String>,

    pub max_score: Option<f64>,
}

impl RawEnvelope {
    /// Decode an envelope, rejecting anything that is not an object.
    pub fn from_value(raw: &Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(ListError::malformed(format!(
                "expected a JSON object, got {}",
                json_type(raw)
            )));
        }
        Self::deserialize(raw).map_err(|e| ListError::malformed(e.to_string()))
    }

    /// Whether the backend answered from a search index.
    pub fn has_search_metadata(&self) -> bool {
        self.search.is_some() || self.engine.is_some() || self.max_score.is_some()
    }
}

/// Relational continuation object.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCursor {
    #[serde(alias = "key", alias = "date")]
    pub secondary_key: Option<Value>,
    pub id: Option<Value>,
}

impl RawCursor {
    pub fn into_cursor(self) -> Result<PaginationCursor> {
        let secondary_key = self
            .secondary_key
            .as_ref()
            .and_then(scalar_string)
            .ok_or_else(|| ListError::malformed("cursor is missing its secondary key"))?;
        let id = self
            .id
            .as_ref()
            .and_then(scalar_string)
            .ok_or_else(|| ListError::malformed("cursor is missing its id"))?;
        Ok(PaginationCursor::relational(secondary_key, id))
    }
}

/// Search metadata block.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSearch {
    pub engine: Option<String>,
    pub total_hits: Option<u64>,
    pub max_score: Option<f64>,
    pub next_offset: Option<u64>,
    /// Item key → field → fragment(s).
    pub highlights: Option<Map<String, Value>>,
}

/// String form of a string or number value.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
