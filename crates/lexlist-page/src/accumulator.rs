//! Ordered, de-duplicated accumulation of result pages.

use std::collections::HashMap;

use lexlist_model::{
    Item, ItemKey, ListError, PaginationCursor, PaginationKind, Result, ResultPage, TotalCount,
};

/// Outcome of appending one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendStats {
    /// Items new to the list.
    pub added: usize,
    /// Items that replaced an existing copy in place.
    pub replaced: usize,
}

/// Items loaded so far for one list, plus where to continue.
#[derive(Debug, Clone)]
pub struct ListAccumulator {
    items: Vec<Item>,
    /// Position of each key in `items`.
    index: HashMap<ItemKey, usize>,
    kind: Option<PaginationKind>,
    cursor: PaginationCursor,
    has_more: bool,
    total: Option<u64>,
    page_size: usize,
}

impl ListAccumulator {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            kind: None,
            cursor: PaginationCursor::None,
            has_more: false,
            total: None,
            page_size,
        }
    }

    /// Replace the list with a first page.
    pub fn reset(&mut self, page: ResultPage) -> AppendStats {
        self.items.clear();
        self.index.clear();
        self.kind = page.kind;
        self.cursor = page.next_cursor;
        self.has_more = page.has_more;
        self.total = page.total;
        self.extend(page.items)
    }

    /// Add a continuation page.
    ///
    /// An item already in the list is replaced in place by the newer copy.
    /// A page using a different pagination scheme is rejected and the list
    /// is left untouched.
    pub fn append(&mut self, page: ResultPage) -> Result<AppendStats> {
        if let (Some(established), Some(incoming)) = (self.kind, page.kind)
            && established != incoming
        {
            return Err(ListError::malformed(format!(
                "{incoming} page cannot continue a {established} list"
            )));
        }
        if self.kind.is_none() {
            self.kind = page.kind;
        }
        self.cursor = page.next_cursor;
        self.has_more = page.has_more;
        if page.total.is_some() {
            self.total = page.total;
        }
        Ok(self.extend(page.items))
    }

    /// Drop everything, as before the first page.
    pub fn clear(&mut self) {
        *self = Self::new(self.page_size);
    }

    fn extend(&mut self, items: Vec<Item>) -> AppendStats {
        let mut stats = AppendStats::default();
        for item in items {
            match self.index.get(&item.key) {
                Some(&pos) => {
                    self.items[pos] = item;
                    stats.replaced += 1;
                }
                None => {
                    self.index.insert(item.key.clone(), self.items.len());
                    self.items.push(item);
                    stats.added += 1;
                }
            }
        }
        stats
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn kind(&self) -> Option<PaginationKind> {
        self.kind
    }

    /// Backend-supplied total, if any.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Exact total when known, otherwise loaded items plus one page if more remain.
    pub fn total_count(&self) -> TotalCount {
        match self.total {
            Some(total) => TotalCount::Exact(total),
            None => {
                let pending = if self.has_more { self.page_size } else { 0 };
                TotalCount::Estimate((self.items.len() + pending) as u64)
            }
        }
    }
}
