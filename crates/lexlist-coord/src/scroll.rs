//! Infinite-scroll trigger.
//!
//! Two kinds of viewport signal feed one throttled entry point:
//! intersection reports for a sentinel placed after the last item, and raw
//! scroll-position samples as a fallback for hosts without intersection
//! reporting. Either way, a `LoadMore` decision is only a request; the
//! coordinator still enforces single-flight.

use std::time::{Duration, Instant};

use lexlist_model::ListConfig;

/// Identity of the sentinel element a host attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentinelId(pub u64);

/// Sentinel position relative to the top of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelGeometry {
    pub top: f64,
    pub height: f64,
    pub viewport_height: f64,
}

/// Scroll container metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the end of content.
    pub fn distance_to_bottom(&self) -> f64 {
        (self.scroll_height - (self.scroll_top + self.client_height)).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportSignal {
    Intersection {
        sentinel: SentinelId,
        geometry: SentinelGeometry,
    },
    Scroll(ScrollMetrics),
}

/// What the coordinator currently allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerGate {
    /// The next page cannot be requested: a request is in flight, nothing
    /// has loaded yet, or a failure is waiting on retry.
    pub busy: bool,
    /// The list has a continuation.
    pub has_more: bool,
}

/// Result of evaluating one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Near the end; request the next page.
    LoadMore,
    /// Evaluated, but not close enough.
    NotNear,
    /// Inside the throttle window; kept for [`ScrollTrigger::flush_pending`].
    Throttled,
    /// The list is not ready for another page; the signal was dropped.
    Busy,
    /// Nothing more to load.
    Exhausted,
    /// Detached, or the signal was for another sentinel.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    sentinel: Option<SentinelId>,
    root_margin: f64,
    threshold: f64,
    fallback_distance: f64,
    throttle: Duration,
    last_evaluated: Option<Instant>,
    pending: Option<ViewportSignal>,
}

impl ScrollTrigger {
    pub fn new(config: &ListConfig) -> Self {
        Self {
            sentinel: None,
            root_margin: config.root_margin_px,
            threshold: config.visibility_threshold,
            fallback_distance: config.scroll_fallback_px,
            throttle: Duration::from_millis(config.throttle_ms),
            last_evaluated: None,
            pending: None,
        }
    }

    /// Start observing `sentinel`, replacing any previous one.
    pub fn attach(&mut self, sentinel: SentinelId) {
        self.sentinel = Some(sentinel);
        self.pending = None;
    }

    /// Stop observing. Later signals are ignored until the next attach.
    pub fn detach(&mut self) {
        self.sentinel = None;
        self.pending = None;
    }

    pub fn is_attached(&self) -> bool {
        self.sentinel.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When a coalesced signal may be evaluated.
    pub fn next_flush(&self) -> Option<Instant> {
        self.pending?;
        Some(self.last_evaluated.map_or_else(Instant::now, |t| t + self.throttle))
    }

    pub fn evaluate(
        &mut self,
        signal: ViewportSignal,
        now: Instant,
        gate: TriggerGate,
    ) -> TriggerDecision {
        let Some(attached) = self.sentinel else {
            return TriggerDecision::Ignored;
        };
        if let ViewportSignal::Intersection { sentinel, .. } = signal
            && sentinel != attached
        {
            return TriggerDecision::Ignored;
        }
        if gate.busy {
            self.pending = None;
            return TriggerDecision::Busy;
        }
        if !gate.has_more {
            self.pending = None;
            return TriggerDecision::Exhausted;
        }
        if self
            .last_evaluated
            .is_some_and(|last| now.duration_since(last) < self.throttle)
        {
            tracing::trace!("coalescing viewport signal inside throttle window");
            self.pending = Some(signal);
            return TriggerDecision::Throttled;
        }

        self.last_evaluated = Some(now);
        self.pending = None;
        if self.is_near_end(&signal) {
            TriggerDecision::LoadMore
        } else {
            TriggerDecision::NotNear
        }
    }

    /// Evaluate the coalesced signal once the throttle window has passed.
    pub fn flush_pending(&mut self, now: Instant, gate: TriggerGate) -> Option<TriggerDecision> {
        let due = self
            .last_evaluated
            .is_none_or(|last| now.duration_since(last) >= self.throttle);
        if !due {
            return None;
        }
        let signal = self.pending.take()?;
        Some(self.evaluate(signal, now, gate))
    }

    fn is_near_end(&self, signal: &ViewportSignal) -> bool {
        match signal {
            ViewportSignal::Intersection { geometry, .. } => self.sentinel_visible(geometry),
            ViewportSignal::Scroll(metrics) => {
                metrics.distance_to_bottom() <= self.fallback_distance
            }
        }
    }

    /// Visible fraction against the viewport extended downward by the margin.
    fn sentinel_visible(&self, geometry: &SentinelGeometry) -> bool {
        let root_bottom = geometry.viewport_height + self.root_margin;
        if geometry.height <= 0.0 {
            return geometry.top >= 0.0 && geometry.top <= root_bottom;
        }
        let bottom = geometry.top + geometry.height;
        let overlap = (bottom.min(root_bottom) - geometry.top.max(0.0)).max(0.0);
        overlap / geometry.height >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: TriggerGate = TriggerGate {
        busy: false,
        has_more: true,
    };

    fn trigger() -> ScrollTrigger {
        let mut trigger = ScrollTrigger::new(&ListConfig::default());
        trigger.attach(SentinelId(1));
        trigger
    }

    fn at(top: f64) -> ViewportSignal {
        ViewportSignal::Intersection {
            sentinel: SentinelId(1),
            geometry: SentinelGeometry {
                top,
                height: 20.0,
                viewport_height: 800.0,
            },
        }
    }

    fn scrolled(scroll_top: f64) -> ViewportSignal {
        ViewportSignal::Scroll(ScrollMetrics {
            scroll_top,
            client_height: 800.0,
            scroll_height: 4000.0,
        })
    }

    #[test]
    fn test_sentinel_inside_root_margin_triggers() {
        let now = Instant::now();
        // 150px below the fold, inside the 200px margin.
        assert_eq!(trigger().evaluate(at(950.0), now, OPEN), TriggerDecision::LoadMore);
        assert_eq!(trigger().evaluate(at(1100.0), now, OPEN), TriggerDecision::NotNear);
    }

    #[test]
    fn test_threshold_applies_to_partial_visibility() {
        let now = Instant::now();
        // 1px of 20 visible (5%) is below the 10% threshold.
        assert_eq!(trigger().evaluate(at(999.0), now, OPEN), TriggerDecision::NotNear);
        // 2px of 20 visible meets it.
        assert_eq!(trigger().evaluate(at(998.0), now, OPEN), TriggerDecision::LoadMore);
    }

    #[test]
    fn test_zero_height_sentinel() {
        let mut trigger = trigger();
        let signal = ViewportSignal::Intersection {
            sentinel: SentinelId(1),
            geometry: SentinelGeometry {
                top: 500.0,
                height: 0.0,
                viewport_height: 800.0,
            },
        };
        assert_eq!(trigger.evaluate(signal, Instant::now(), OPEN), TriggerDecision::LoadMore);
    }

    #[test]
    fn test_scroll_fallback_distance() {
        let now = Instant::now();
        assert_eq!(trigger().evaluate(scrolled(2900.0), now, OPEN), TriggerDecision::LoadMore);
        assert_eq!(trigger().evaluate(scrolled(1000.0), now, OPEN), TriggerDecision::NotNear);
    }

    #[test]
    fn test_short_list_triggers_fallback() {
        let signal = ViewportSignal::Scroll(ScrollMetrics {
            scroll_top: 0.0,
            client_height: 800.0,
            scroll_height: 300.0,
        });
        assert_eq!(
            trigger().evaluate(signal, Instant::now(), OPEN),
            TriggerDecision::LoadMore
        );
    }

    #[test]
    fn test_throttle_coalesces_latest_signal() {
        let t0 = Instant::now();
        let mut trigger = trigger();
        assert_eq!(trigger.evaluate(scrolled(0.0), t0, OPEN), TriggerDecision::NotNear);

        let t1 = t0 + Duration::from_millis(50);
        assert_eq!(trigger.evaluate(scrolled(1000.0), t1, OPEN), TriggerDecision::Throttled);
        assert_eq!(trigger.evaluate(scrolled(3000.0), t1, OPEN), TriggerDecision::Throttled);
        assert_eq!(trigger.next_flush(), Some(t0 + Duration::from_millis(150)));

        assert_eq!(trigger.flush_pending(t1, OPEN), None);
        assert_eq!(
            trigger.flush_pending(t0 + Duration::from_millis(150), OPEN),
            Some(TriggerDecision::LoadMore)
        );
        assert!(!trigger.has_pending());
    }

    #[test]
    fn test_busy_drops_signal() {
        let mut trigger = trigger();
        let busy = TriggerGate {
            busy: true,
            has_more: true,
        };
        assert_eq!(trigger.evaluate(at(900.0), Instant::now(), busy), TriggerDecision::Busy);
        assert!(!trigger.has_pending());
    }

    #[test]
    fn test_exhausted_and_ignored() {
        let mut trigger = trigger();
        let done = TriggerGate {
            busy: false,
            has_more: false,
        };
        let now = Instant::now();
        assert_eq!(trigger.evaluate(at(900.0), now, done), TriggerDecision::Exhausted);

        let other = ViewportSignal::Intersection {
            sentinel: SentinelId(2),
            geometry: SentinelGeometry {
                top: 0.0,
                height: 20.0,
                viewport_height: 800.0,
            },
        };
        assert_eq!(trigger.evaluate(other, now, OPEN), TriggerDecision::Ignored);

        trigger.detach();
        assert_eq!(trigger.evaluate(scrolled(3000.0), now, OPEN), TriggerDecision::Ignored);
    }
}
