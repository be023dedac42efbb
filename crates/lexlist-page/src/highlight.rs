//! Highlight fragment normalization.

use lexlist_model::{Highlights, ListError, Result};
use serde_json::Value;

use crate::raw::json_type;

/// Keys under which backends attach highlights to an item.
pub(crate) const INLINE_HIGHLIGHT_KEYS: [&str; 3] = ["highlight", "highlights", "_highlight"];

/// Normalize a `field → fragment(s)` object.
///
/// A string becomes a one-element sequence, an array keeps its order, and
/// `null` or `[]` become an explicit empty sequence (the field was searched
/// but nothing matched).
pub(crate) fn normalize(raw: &Value) -> Result<Highlights> {
    let mut highlights = Highlights::new();
    let fields = match raw {
        Value::Null => return Ok(highlights),
        Value::Object(fields) => fields,
        other => {
            return Err(ListError::malformed(format!(
                "highlights must be an object, got {}",
                json_type(other)
            )));
        }
    };

    for (field, value) in fields {
        let fragments = match value {
            Value::Null => Vec::new(),
            Value::String(s) => vec![s.clone()],
            Value::Array(values) => values
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        ListError::malformed(format!(
                            "highlight fragment for '{field}' must be a string, got {}",
                            json_type(v)
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(ListError::malformed(format!(
                    "highlight for '{field}' must be a string or array, got {}",
                    json_type(other)
                )));
            }
        };
        highlights.insert(field.clone(), fragments);
    }
    Ok(highlights)
}

/// Overlay `other` onto `base`; fields present in `other` win.
pub(crate) fn overlay(base: &mut Highlights, other: Highlights) {
    for (field, fragments) in other {
        base.insert(field, fragments);
    }
}
