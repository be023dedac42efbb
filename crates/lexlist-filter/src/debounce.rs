//! Debounce tracking for typed filter input.

use std::time::{Duration, Instant};

/// Tracks uncommitted filter edits.
///
/// Every edit pushes the deadline back; the edit commits once the input has
/// been quiet for the whole window. Time is always supplied by the caller.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period required before a commit.
    window: Duration,

    /// When the most recent edit was made.
    last_edit: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with no pending edits.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_edit: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an edit at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// Check if an edit is waiting to commit.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    /// When the pending edit commits, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_edit.map(|t| t + self.window)
    }

    /// Whether the pending edit has been quiet long enough.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Take the pending edit regardless of the deadline.
    ///
    /// Returns true if something was pending.
    pub fn flush(&mut self) -> bool {
        self.last_edit.take().is_some()
    }

    /// Drop any pending edit.
    pub fn cancel(&mut self) {
        self.last_edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_debouncer_is_idle() {
        let debouncer = Debouncer::from_millis(300);
        assert!(!debouncer.is_pending());
        assert!(debouncer.deadline().is_none());
        assert!(!debouncer.is_due(Instant::now()));
    }

    #[test]
    fn test_each_edit_restarts_the_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::from_millis(300);

        debouncer.mark(start);
        debouncer.mark(start + Duration::from_millis(200));

        // 300ms after the first edit, but only 100ms after the last one
        assert!(!debouncer.is_due(start + Duration::from_millis(300)));
        assert!(debouncer.is_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_flush_and_cancel() {
        let now = Instant::now();
        let mut debouncer = Debouncer::from_millis(300);

        debouncer.mark(now);
        assert!(debouncer.flush());
        assert!(!debouncer.flush());

        debouncer.mark(now);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
    }
}
