//! Two-layer filter store.
//!
//! Inputs render from the `local` layer, which changes on every keystroke.
//! The `committed` layer trails it by the debounce window and is the only
//! layer written to the URL and used for fetches.

use std::time::Instant;

use lexlist_model::{
    FilterPatch, FilterSchema, FilterSet, ListConfig, ListError, Result, UrlWriteMode,
};
use url::Url;

use crate::debounce::Debouncer;
use crate::history::History;
use crate::query::{apply_filters_to_url, parse_filters};

/// Filter state for one list, mirrored into a navigable URL.
#[derive(Debug)]
pub struct FilterStore<H: History> {
    schema: FilterSchema,
    local: FilterSet,
    committed: FilterSet,
    debouncer: Debouncer,
    /// Key of the input currently holding focus.
    focused: Option<String>,
    write_mode: UrlWriteMode,
    history: H,
}

impl<H: History> FilterStore<H> {
    /// Create a store whose committed layer is read from the current URL.
    pub fn new(schema: FilterSchema, config: &ListConfig, history: H) -> Self {
        let committed = parse_filters(&schema, history.current().query());
        Self {
            local: committed.clone(),
            committed,
            debouncer: Debouncer::from_millis(config.debounce_ms),
            focused: None,
            write_mode: config.url_write_mode,
            schema,
            history,
        }
    }

    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    /// Committed filters, the ones fetches use.
    pub fn get(&self) -> &FilterSet {
        &self.committed
    }

    /// Latest input values, possibly ahead of the committed layer.
    pub fn local(&self) -> &FilterSet {
        &self.local
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When a pending debounce will commit.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Apply a user edit.
    ///
    /// Values are coerced to their field's kind, so `"2019"` on a number
    /// filter is stored as the number it reads back as from the URL.
    /// Returns the new committed set when the edit committed immediately
    /// (select-kind fields), `None` when it is waiting on the debounce or
    /// changed nothing. Unknown keys and non-numeric input on number
    /// filters reject the whole patch.
    pub fn set(&mut self, patch: &FilterPatch, now: Instant) -> Result<Option<FilterSet>> {
        let mut immediate = false;
        let mut debounced = false;
        let mut values = Vec::with_capacity(patch.changes().len());
        for (key, value) in patch.changes() {
            let field = self
                .schema
                .field(key)
                .ok_or_else(|| ListError::UnknownFilter { key: key.clone() })?;
            let value = value
                .coerce(field.kind)
                .ok_or_else(|| ListError::InvalidFilterValue {
                    key: key.clone(),
                    value: value.to_string(),
                })?;
            if field.kind.is_debounced() {
                debounced = true;
            } else {
                immediate = true;
            }
            values.push((key, value));
        }

        for (key, value) in values {
            self.local.insert(key, value);
        }

        if immediate {
            // Committing takes the pending typed edits along with it.
            return Ok(self.commit());
        }
        if debounced {
            self.debouncer.mark(now);
        }
        Ok(None)
    }

    /// An input gained focus.
    pub fn focus(&mut self, key: &str) {
        self.focused = Some(key.to_string());
    }

    /// The focused input lost focus; any pending edit commits now.
    pub fn blur(&mut self) -> Option<FilterSet> {
        self.focused = None;
        if self.debouncer.flush() {
            self.commit()
        } else {
            None
        }
    }

    /// Commit the pending edit if its debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FilterSet> {
        if self.debouncer.is_due(now) {
            self.commit()
        } else {
            None
        }
    }

    /// Reset both layers to schema defaults and commit immediately.
    pub fn clear(&mut self) -> Option<FilterSet> {
        self.local = self.schema.defaults();
        self.commit()
    }

    /// The URL changed outside the store (back/forward navigation).
    ///
    /// Re-reads the committed layer without writing the URL back. The local
    /// layer follows only while no input holds focus, so typing is never
    /// overwritten mid-word. Returns the committed set when it changed.
    pub fn on_url_changed(&mut self) -> Option<FilterSet> {
        let parsed = parse_filters(&self.schema, self.history.current().query());
        if self.focused.is_none() {
            self.debouncer.cancel();
            self.local = parsed.clone();
        }
        if parsed == self.committed {
            return None;
        }
        tracing::debug!(filters = ?parsed, "filters changed by navigation");
        self.committed = parsed;
        Some(self.committed.clone())
    }

    /// Current URL.
    pub fn url(&self) -> &Url {
        self.history.current()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable history access for hosts simulating navigation.
    ///
    /// Call [`FilterStore::on_url_changed`] afterwards.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Promote `local` to `committed`, writing the URL exactly once.
    fn commit(&mut self) -> Option<FilterSet> {
        self.debouncer.cancel();
        if self.local == self.committed {
            return None;
        }
        self.committed = self.local.clone();
        let url = apply_filters_to_url(&self.schema, self.history.current(), &self.committed);
        tracing::debug!(url = %url, mode = ?self.write_mode, "committing filters");
        self.history.write(self.write_mode, url);
        Some(self.committed.clone())
    }
}
