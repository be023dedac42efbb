//! Request coordination for paginated, filterable lists.
//!
//! - `coordinator` - single-flight [`RequestCoordinator`] state machine
//! - `scroll` - [`ScrollTrigger`] deciding when to load more
//! - `fetcher` - the [`PageFetcher`] seam to the host's network layer
//! - `controller` - [`ListController`] wiring everything to an async fetcher

pub mod controller;
pub mod coordinator;
pub mod fetcher;
pub mod scroll;

pub use controller::{ListController, ViewportOutcome};
pub use coordinator::{Completion, RequestCoordinator};
pub use fetcher::PageFetcher;
pub use scroll::{
    ScrollMetrics, ScrollTrigger, SentinelGeometry, SentinelId, TriggerDecision, TriggerGate,
    ViewportSignal,
};
