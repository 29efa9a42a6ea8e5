//! Database access layer.
//!
//! This module holds the single shared DuckDB connection and the value
//! conversion used to shape results for the protocol:
//! - Connection lifecycle (in-memory vs MotherDuck)
//! - Statement execution with bounded previews
//! - Schema introspection (SHOW TABLES, DESCRIBE, SUMMARIZE)
//! - DuckDB value to JSON mapping

pub mod connection;
pub mod types;

pub use connection::{Database, quote_ident, quote_literal};
