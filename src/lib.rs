//! jsondb - a single-user tabular store driven by a SQL-like command language
//!
//! This crate provides:
//! - Statement parsing (lexer, parser, AST)
//! - A typed record model with convert-then-validate coercion
//! - Statement execution with single equality WHERE filters
//! - Write-through persistence, one JSON document per database

pub mod config;
pub mod error;
pub mod sql;
pub mod storage;
