//! Response interpretation and list accumulation.
//!
//! - `interpret` - [`ResponseInterpreter`] turning raw payloads into pages
//! - `accumulator` - [`ListAccumulator`] merging pages into one list
//! - `raw` / `highlight` - wire shapes and highlight normalization

pub mod accumulator;
mod highlight;
pub mod interpret;
mod raw;

pub use accumulator::{AppendStats, ListAccumulator};
pub use interpret::ResponseInterpreter;
