//! Statement processing
//!
//! This module provides:
//! - `parser`: lexer and recursive-descent parser
//! - `types`: column data types, values and coercion
//! - `schema`: columns, rows, tables and databases
//! - `executor`: one executor per statement kind
//! - `engine`: the session that ties parsing and execution together

pub mod engine;
pub mod executor;
pub mod parser;
pub mod schema;
pub mod types;
