//! Debounced filter store mirrored into the URL query string.
//!
//! - `store` - [`FilterStore`] with local/committed layers
//! - `query` - reading and writing schema keys in a query string
//! - `history` - the [`History`] abstraction and an in-memory implementation
//! - `debounce` - keystroke debounce tracking

pub mod debounce;
pub mod history;
pub mod query;
pub mod store;

pub use debounce::Debouncer;
pub use history::{History, MemoryHistory};
pub use query::{apply_filters_to_url, merge_filters_into_query, parse_filters};
pub use store::FilterStore;
