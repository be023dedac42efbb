//! Shared types for paginated, filterable list views.
//!
//! This crate holds the data model used by every other `lexlist` crate:
//!
//! - `filter` - filter schema, values and patches
//! - `cursor` - relational / search-offset resume points
//! - `item` - list items and identity keys
//! - `page` - interpreted result pages and search metadata
//! - `request` - page requests handed to host fetchers
//! - `state` - read-only list state for rendering
//! - `config` - list configuration
//! - `error` - error types with user-friendly messages

pub mod config;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod item;
pub mod page;
pub mod request;
pub mod state;

pub use config::{ListConfig, UrlWriteMode};
pub use cursor::{PaginationCursor, PaginationKind};
pub use error::{ErrorKind, FetchError, ListError, Result};
pub use filter::{FilterField, FilterKind, FilterPatch, FilterSchema, FilterSet, FilterValue};
pub use item::{Highlights, Item, ItemKey};
pub use page::{ResultPage, SearchMetadata};
pub use request::{FetchKind, PageRequest, RequestId};
pub use state::{ErrorInfo, ErrorScope, ListPhase, ListState, TotalCount};
