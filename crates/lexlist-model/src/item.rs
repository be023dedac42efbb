//! List items and their identity keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highlight fragments per field, in backend order.
///
/// A field mapped to an empty vector means "searched, nothing to highlight".
pub type Highlights = BTreeMap<String, Vec<String>>;

/// Stable identity of an item across pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a list: an opaque backend payload plus highlight metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub key: ItemKey,
    pub payload: Value,
    #[serde(default)]
    pub highlights: Highlights,
}

impl Item {
    pub fn new(key: ItemKey, payload: Value) -> Self {
        Self {
            key,
            payload,
            highlights: Highlights::new(),
        }
    }

    /// String field of the payload, if present.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.payload.get(name).and_then(Value::as_str)
    }

    /// Best-effort display title for tables and logs.
    pub fn title(&self) -> &str {
        ["title", "name", "case_name", "short_title"]
            .iter()
            .find_map(|f| self.field_str(f))
            .unwrap_or("-")
    }
}
