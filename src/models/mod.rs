//! Data models for the Data Analyst MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod query;
pub mod table;

// Re-export commonly used types
pub use query::{DEFAULT_PREVIEW_ROWS, MAX_PREVIEW_ROWS, QueryPreview, SAMPLE_ROWS};
pub use table::{ColumnInfo, ColumnStats, ImportOutcome, TableDescription, TableSummary};
