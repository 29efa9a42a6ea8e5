//! Query result export tool.
//!
//! Implements the `export_query_results` MCP tool. Results are streamed to a
//! CSV file by the database itself, so large result sets never pass through
//! the gateway process.

use crate::db::Database;
use crate::error::{GatewayError, GatewayResult};
use crate::tools::sql_validator;
use humansize::{DECIMAL, format_size};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Input for the export_query_results tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExportQueryResultsInput {
    /// SQL SELECT statement producing the rows to export
    pub sql: String,
    /// Destination CSV path. Relative paths resolve inside the data directory.
    pub destination_path: String,
}

/// Output from the export_query_results tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ExportQueryResultsOutput {
    /// Path the CSV file was written to
    pub destination_path: String,
    /// Number of rows exported
    pub row_count: u64,
    /// Size of the written file, human readable
    pub file_size: String,
    /// Human-readable confirmation
    pub message: String,
}

/// Resolve a destination path against the data directory.
///
/// Relative paths land inside `data_dir`; absolute paths and `..` segments
/// are rejected so exports cannot escape the mounted directory.
pub fn resolve_destination(raw: &str, data_dir: &Path) -> GatewayResult<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::invalid_input(
            "destination_path must not be empty",
        ));
    }
    let candidate = Path::new(trimmed);
    if candidate.is_absolute() {
        return Err(GatewayError::not_permitted(
            "absolute export path",
            format!("Destination must be relative to the data directory ({})", data_dir.display()),
        ));
    }
    if candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(GatewayError::not_permitted(
            "export path with '..'",
            "Destination must stay inside the data directory",
        ));
    }
    Ok(data_dir.join(candidate))
}

/// Handler for result export.
pub struct ExportToolHandler {
    db: Arc<Database>,
    data_dir: PathBuf,
}

impl ExportToolHandler {
    /// Create a new export tool handler.
    pub fn new(db: Arc<Database>, data_dir: PathBuf) -> Self {
        Self { db, data_dir }
    }

    /// Handle the export_query_results tool call.
    pub fn export(&self, input: ExportQueryResultsInput) -> GatewayResult<ExportQueryResultsOutput> {
        sql_validator::validate_readonly(&input.sql)?;
        let destination = resolve_destination(&input.destination_path, &self.data_dir)?;

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GatewayError::io(
                    format!("Failed to create export directory {}: {e}", parent.display()),
                    "Check that the data directory is writable",
                )
            })?;
        }

        let row_count = self.db.export_csv(&input.sql, &destination)?;
        let file_size = std::fs::metadata(&destination)
            .map(|m| format_size(m.len(), DECIMAL))
            .map_err(|e| {
                GatewayError::io(
                    format!("Export reported success but {} is unreadable: {e}", destination.display()),
                    "Check the data directory permissions",
                )
            })?;

        info!(
            destination = %destination.display(),
            row_count,
            file_size = %file_size,
            "Query results exported"
        );

        let destination_path = destination.display().to_string();
        Ok(ExportQueryResultsOutput {
            message: format!("Exported {row_count} rows to {destination_path} ({file_size})"),
            destination_path,
            row_count,
            file_size,
        })
    }
}
