//! Developer harness for the lexlist crates.

pub mod logging;
pub mod profile;
pub mod replay;
