//! Filter schema and filter value types.
//!
//! A list declares its filters once through a [`FilterSchema`]. The current
//! values live in a [`FilterSet`], which stores only non-empty values so that
//! "empty" and "absent" are the same thing everywhere.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ListError, Result};

// =============================================================================
// FILTER VALUE
// =============================================================================

/// Value of a single filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<ScalarRepr>", into = "Option<ScalarRepr>")]
pub enum FilterValue {
    /// Not set. Never written to the URL or sent to the backend.
    #[default]
    Empty,
    /// Free text or a select option.
    Text(String),
    /// Whole number (years, section numbers).
    Number(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ScalarRepr {
    Number(i64),
    Text(String),
}

impl From<Option<ScalarRepr>> for FilterValue {
    fn from(repr: Option<ScalarRepr>) -> Self {
        match repr {
            None => Self::Empty,
            Some(ScalarRepr::Number(n)) => Self::Number(n),
            Some(ScalarRepr::Text(s)) => Self::text(s),
        }
    }
}

impl From<FilterValue> for Option<ScalarRepr> {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Empty => None,
            FilterValue::Text(s) => Some(ScalarRepr::Text(s)),
            FilterValue::Number(n) => Some(ScalarRepr::Number(n)),
        }
    }
}

impl FilterValue {
    /// Text value; the empty string collapses to [`FilterValue::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Parse a raw query-string value for a filter of the given kind.
    ///
    /// Unparseable numbers yield `None` so callers can fall back to a default.
    pub fn parse(kind: FilterKind, raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(Self::Empty);
        }
        match kind {
            FilterKind::Text | FilterKind::Select => Some(Self::Text(raw.to_string())),
            FilterKind::Number => raw.trim().parse::<i64>().ok().map(Self::Number),
        }
    }

    /// Reinterpret this value for a filter of `kind`, as if it had been read
    /// back from the URL. `None` when a number filter gets non-numeric text.
    pub fn coerce(&self, kind: FilterKind) -> Option<Self> {
        Self::parse(kind, &self.to_query_value().unwrap_or_default())
    }

    /// String form used in query strings, `None` when empty.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

/// How a filter is edited, which decides whether edits are debounced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Free-text input; debounced.
    #[default]
    Text,
    /// Fixed choice (dropdown, tab); commits immediately.
    Select,
    /// Typed number input; debounced.
    Number,
}

impl FilterKind {
    /// Whether edits of this kind wait for the debounce window.
    pub fn is_debounced(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// One filter declared by a list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// Query-string key (e.g. "court", "q").
    pub key: String,
    /// Editing behavior.
    #[serde(default)]
    pub kind: FilterKind,
    /// Value restored by `clear()` and assumed when the URL omits the key.
    #[serde(default)]
    pub default: FilterValue,
    /// Whether a non-empty value asks the backend for highlight fragments.
    #[serde(default)]
    pub highlight: bool,
}

impl FilterField {
    pub fn new(key: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            kind,
            default: FilterValue::Empty,
            highlight: false,
        }
    }

    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Text)
    }

    pub fn select(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Select)
    }

    pub fn number(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Number)
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<FilterValue>) -> Self {
        self.default = value.into();
        self
    }

    #[must_use]
    pub fn with_highlight(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// Fixed set of filters a list page understands.
///
/// Field order is the order filters are written to the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FilterField>", into = "Vec<FilterField>")]
pub struct FilterSchema {
    fields: Vec<FilterField>,
}

impl FilterSchema {
    /// Build a schema, rejecting empty or duplicate keys.
    ///
    /// Defaults are coerced to their field's kind.
    pub fn new(mut fields: Vec<FilterField>) -> Result<Self> {
        for field in &mut fields {
            field.default =
                field
                    .default
                    .coerce(field.kind)
                    .ok_or_else(|| ListError::InvalidConfig {
                        field: "filters",
                        reason: format!("gives '{}' a default that is not a number", field.key),
                    })?;
        }
        for (idx, field) in fields.iter().enumerate() {
            if field.key.is_empty() {
                return Err(ListError::InvalidConfig {
                    field: "filters",
                    reason: "contains a filter with an empty key".to_string(),
                });
            }
            if fields[..idx].iter().any(|f| f.key == field.key) {
                return Err(ListError::InvalidConfig {
                    field: "filters",
                    reason: format!("declares '{}' more than once", field.key),
                });
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Filter set holding every field's default.
    pub fn defaults(&self) -> FilterSet {
        let mut set = FilterSet::new();
        for field in &self.fields {
            set.insert(&field.key, field.default.clone());
        }
        set
    }

    /// Whether `filters` has a non-empty value on a highlight-enabled field.
    pub fn highlight_requested(&self, filters: &FilterSet) -> bool {
        self.fields
            .iter()
            .any(|f| f.highlight && !filters.get(&f.key).is_empty())
    }
}

impl TryFrom<Vec<FilterField>> for FilterSchema {
    type Error = ListError;

    fn try_from(fields: Vec<FilterField>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<FilterSchema> for Vec<FilterField> {
    fn from(schema: FilterSchema) -> Self {
        schema.fields
    }
}

// =============================================================================
// FILTER SET
// =============================================================================

/// Current filter values, keyed by filter name.
///
/// Empty values are never stored, so two sets compare equal exactly when
/// they would produce the same request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, FilterValue>",
    into = "BTreeMap<String, FilterValue>"
)]
pub struct FilterSet {
    values: BTreeMap<String, FilterValue>,
}

impl From<BTreeMap<String, FilterValue>> for FilterSet {
    fn from(mut values: BTreeMap<String, FilterValue>) -> Self {
        values.retain(|_, v| !v.is_empty());
        Self { values }
    }
}

impl From<FilterSet> for BTreeMap<String, FilterValue> {
    fn from(set: FilterSet) -> Self {
        set.values
    }
}

static EMPTY: FilterValue = FilterValue::Empty;

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, [`FilterValue::Empty`] when unset.
    pub fn get(&self, key: &str) -> &FilterValue {
        self.values.get(key).unwrap_or(&EMPTY)
    }

    /// Set a value, returning true when it changed.
    pub fn insert(&mut self, key: &str, value: FilterValue) -> bool {
        if value.is_empty() {
            self.values.remove(key).is_some()
        } else if self.values.get(key) == Some(&value) {
            false
        } else {
            self.values.insert(key.to_string(), value);
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Non-empty values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Chainable insert for building sets in tests and fixtures.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value.into());
        self
    }
}

/// A partial update to a filter set.
///
/// Unlike [`FilterSet`] a patch can carry explicit empties, which clear a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    changes: Vec<(String, FilterValue)>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.changes.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[(String, FilterValue)] {
        &self.changes
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterPatch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            changes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
