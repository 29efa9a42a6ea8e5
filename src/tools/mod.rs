//! MCP tool implementations.
//!
//! This module contains all gateway tool handlers:
//! - `import_csv`: Load a CSV file, URL, or Google Sheet into a table
//! - `query_data`: Execute read-only SQL with a bounded preview
//! - `list_tables`: List loaded tables with row/column counts
//! - `describe_table`: Table schema, row count, and sample rows
//! - `export_query_results`: Write query results to a CSV file
//! - `get_table_stats`: Per-column summary statistics
//! - `sql_validator`: AST-based read-only enforcement

pub mod export;
pub mod format;
pub mod import;
pub mod query;
pub mod schema;
pub mod sql_validator;
pub mod stats;

pub use export::{ExportQueryResultsInput, ExportQueryResultsOutput, ExportToolHandler};
pub use import::{ImportCsvInput, ImportCsvOutput, ImportToolHandler};
pub use query::{QueryDataInput, QueryDataOutput, QueryToolHandler};
pub use schema::{
    DescribeTableInput, DescribeTableOutput, ListTablesOutput, SchemaToolHandler,
};
pub use stats::{GetTableStatsInput, GetTableStatsOutput, StatsToolHandler};

use crate::error::{GatewayError, GatewayResult};

/// Validate a user-supplied table name.
///
/// Names are interpolated (quoted) into SQL, so the gateway additionally
/// restricts them to identifier characters to keep tool output readable and
/// reference errors obvious.
pub fn validate_table_name(name: &str) -> GatewayResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::invalid_input("table_name must not be empty"));
    }
    let mut chars = trimmed.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !first_ok || !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GatewayError::invalid_input(format!(
            "table_name '{trimmed}' is not a valid identifier (letters, digits, underscore; must not start with a digit)"
        )));
    }
    Ok(trimmed)
}
