//! Persistence: where database documents live, and the catalog that owns them.
//!
//! - `engine`: the `Storage` trait
//! - `json`: one JSON file per database in a data directory
//! - `memory`: documents held in memory
//! - `catalog`: loaded databases, the current selection, write-through saves

pub mod catalog;
pub mod engine;
pub mod json;
pub mod memory;
