//! Navigable URL history.

use lexlist_model::UrlWriteMode;
use url::Url;

/// Browser-style history the filter store writes its URL into.
pub trait History {
    /// URL of the current entry.
    fn current(&self) -> &Url;

    /// Add a new entry and make it current.
    fn push(&mut self, url: Url);

    /// Overwrite the current entry.
    fn replace(&mut self, url: Url);

    /// Write `url` using the configured mode.
    fn write(&mut self, mode: UrlWriteMode, url: Url) {
        match mode {
            UrlWriteMode::Push => self.push(url),
            UrlWriteMode::Replace => self.replace(url),
        }
    }
}

/// In-memory history with back/forward navigation.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Url>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Number of entries, including forward ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    /// Move one entry back. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Move one entry forward. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl History for MemoryHistory {
    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    fn push(&mut self, url: Url) {
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, url: Url) {
        self.entries[self.index] = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = MemoryHistory::new(url("https://example.test/a"));
        history.push(url("https://example.test/b"));
        history.push(url("https://example.test/c"));
        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());

        history.push(url("https://example.test/d"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().path(), "/d");
        assert!(!history.forward());
    }

    #[test]
    fn test_write_respects_mode() {
        let mut history = MemoryHistory::new(url("https://example.test/a"));
        history.write(UrlWriteMode::Replace, url("https://example.test/b"));
        assert_eq!(history.len(), 1);
        history.write(UrlWriteMode::Push, url("https://example.test/c"));
        assert_eq!(history.len(), 2);
        assert!(history.back());
        assert_eq!(history.current().path(), "/b");
    }
}
