//! Query execution tool.
//!
//! Implements the `query_data` MCP tool. Statements are validated as
//! read-only first, then executed in one synchronous call; the response
//! carries the true total row count plus a preview capped at the requested
//! limit so result payloads stay bounded.

use crate::db::Database;
use crate::error::GatewayResult;
use crate::models::{DEFAULT_PREVIEW_ROWS, MAX_PREVIEW_ROWS};
use crate::tools::format::{OutputFormat, format_as_markdown, format_as_table};
use crate::tools::sql_validator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the query_data tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryDataInput {
    /// SQL SELECT statement to execute. Write operations are blocked.
    pub sql: String,
    /// Maximum preview rows to return. Default: 100, max: 1000
    #[serde(default)]
    pub limit: Option<u32>,
    /// Output format: "json" returns structured rows, "table" an ASCII table,
    /// "markdown" a markdown table
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output from the query_data tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryDataOutput {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Preview rows as key-value maps. Empty if format is table/markdown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    /// Pre-formatted output when format is table or markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    /// True total number of rows the query produced
    pub row_count: usize,
    /// Number of rows in the preview
    pub preview_count: usize,
    /// True if the preview omits rows
    pub truncated: bool,
    /// Query execution time in milliseconds
    pub execution_time_ms: u64,
    /// Warning message if any issues occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Handler for query execution.
pub struct QueryToolHandler {
    db: Arc<Database>,
    default_limit: u32,
}

impl QueryToolHandler {
    /// Create a new query tool handler.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            default_limit: DEFAULT_PREVIEW_ROWS,
        }
    }

    /// Create a handler with a custom default preview limit.
    pub fn with_default_limit(db: Arc<Database>, default_limit: u32) -> Self {
        Self {
            db,
            default_limit: default_limit.min(MAX_PREVIEW_ROWS),
        }
    }

    /// Handle the query_data tool call.
    ///
    /// Rejects anything that is not a read-only statement before execution,
    /// so a blocked statement can never change table state.
    pub fn query(&self, input: QueryDataInput) -> GatewayResult<QueryDataOutput> {
        sql_validator::validate_readonly(&input.sql)?;

        let warning = input.limit.and_then(|requested| {
            (requested > MAX_PREVIEW_ROWS).then(|| {
                format!(
                    "Requested limit {requested} exceeds maximum allowed ({MAX_PREVIEW_ROWS}). Preview capped to {MAX_PREVIEW_ROWS} rows."
                )
            })
        });
        // limit=0 would mark every non-empty result as truncated
        let effective_limit = input
            .limit
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_PREVIEW_ROWS) as usize;

        let preview = self.db.query_with_preview(&input.sql, effective_limit)?;

        info!(
            row_count = preview.total_rows,
            preview_count = preview.preview_count(),
            truncated = preview.truncated,
            execution_time_ms = preview.execution_time_ms,
            "Query executed"
        );

        let preview_count = preview.preview_count();
        let output = match input.format {
            OutputFormat::Json => QueryDataOutput {
                columns: preview.columns,
                rows: preview.rows,
                formatted: None,
                row_count: preview.total_rows,
                preview_count,
                truncated: preview.truncated,
                execution_time_ms: preview.execution_time_ms,
                warning,
            },
            OutputFormat::Table => QueryDataOutput {
                formatted: Some(format_as_table(
                    &preview.columns,
                    &preview.rows,
                    preview.total_rows,
                )),
                columns: preview.columns,
                rows: Vec::new(),
                row_count: preview.total_rows,
                preview_count,
                truncated: preview.truncated,
                execution_time_ms: preview.execution_time_ms,
                warning,
            },
            OutputFormat::Markdown => QueryDataOutput {
                formatted: Some(format_as_markdown(
                    &preview.columns,
                    &preview.rows,
                    preview.total_rows,
                )),
                columns: preview.columns,
                rows: Vec::new(),
                row_count: preview.total_rows,
                preview_count,
                truncated: preview.truncated,
                execution_time_ms: preview.execution_time_ms,
                warning,
            },
        };
        Ok(output)
    }
}
