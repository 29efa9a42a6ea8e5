//! CSV import tool.
//!
//! Implements the `import_csv` MCP tool. A source can be a local file path
//! (resolved against the mounted data directory), a direct HTTP(S) URL, or a
//! Google Sheets share link, which is rewritten to the sheet's CSV export URL
//! before the database loads it. The actual parsing and table creation happen
//! entirely inside DuckDB's `read_csv_auto`.

use crate::config::ImportConflictPolicy;
use crate::db::Database;
use crate::error::{GatewayError, GatewayResult};
use crate::tools::validate_table_name;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Input for the import_csv tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ImportCsvInput {
    /// CSV file URL, Google Sheets URL, or local file path (relative paths
    /// resolve against the server's data directory)
    pub source: String,
    /// Name for the database table
    pub table_name: String,
}

/// Output from the import_csv tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ImportCsvOutput {
    /// Name of the created table
    pub table_name: String,
    /// Number of imported data rows
    pub row_count: u64,
    /// Column names in table order
    pub columns: Vec<String>,
    /// Human-readable summary
    pub message: String,
}

/// Rewrite a Google Sheets share link to its CSV export URL.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0` becomes
/// `https://docs.google.com/spreadsheets/d/<id>/export?format=csv`; a link
/// that is already an export URL is returned unchanged.
pub fn rewrite_sheet_url(raw: &str) -> GatewayResult<String> {
    let url = Url::parse(raw).map_err(|e| {
        GatewayError::invalid_source(
            format!("Malformed Google Sheets URL '{raw}': {e}"),
            "Copy the share link from the Sheets UI",
        )
    })?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    if segments.contains(&"export") {
        return Ok(raw.to_string());
    }

    let sheet_id = segments
        .iter()
        .position(|s| *s == "d")
        .and_then(|pos| segments.get(pos + 1))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            GatewayError::invalid_source(
                format!("Google Sheets URL '{raw}' has no document id"),
                "Use a link of the form https://docs.google.com/spreadsheets/d/<id>/edit",
            )
        })?;

    Ok(format!(
        "https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv"
    ))
}

/// Resolve a raw source string into something `read_csv_auto` can open.
pub fn resolve_source(raw: &str, data_dir: &Path) -> GatewayResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::invalid_input("source must not be empty"));
    }

    if trimmed.contains("docs.google.com/spreadsheets") {
        return rewrite_sheet_url(trimmed);
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Url::parse(trimmed).map_err(|e| {
            GatewayError::invalid_source(
                format!("Malformed URL '{trimmed}': {e}"),
                "Provide a valid http(s) URL pointing at a CSV file",
            )
        })?;
        return Ok(trimmed.to_string());
    }

    // Local file; relative paths live inside the data directory
    let path = PathBuf::from(trimmed);
    let resolved = if path.is_absolute() {
        path
    } else {
        data_dir.join(path)
    };
    if !resolved.is_file() {
        return Err(GatewayError::invalid_source(
            format!("File not found: {}", resolved.display()),
            "Check the path, or place the file in the server's data directory",
        ));
    }
    Ok(resolved.to_string_lossy().into_owned())
}

/// Handler for CSV imports.
pub struct ImportToolHandler {
    db: Arc<Database>,
    data_dir: PathBuf,
    policy: ImportConflictPolicy,
}

impl ImportToolHandler {
    /// Create a new import tool handler.
    pub fn new(db: Arc<Database>, data_dir: PathBuf, policy: ImportConflictPolicy) -> Self {
        Self {
            db,
            data_dir,
            policy,
        }
    }

    /// Handle the import_csv tool call.
    pub fn import(&self, input: ImportCsvInput) -> GatewayResult<ImportCsvOutput> {
        let table_name = validate_table_name(&input.table_name)?;
        let source = resolve_source(&input.source, &self.data_dir)?;

        let outcome = self.db.import_csv(table_name, &source, self.policy)?;

        info!(
            table_name = %outcome.table_name,
            row_count = outcome.row_count,
            column_count = outcome.columns.len(),
            "CSV imported"
        );

        Ok(ImportCsvOutput {
            message: format!(
                "Imported {} rows into table '{}'",
                outcome.row_count, outcome.table_name
            ),
            table_name: outcome.table_name,
            row_count: outcome.row_count,
            columns: outcome.columns,
        })
    }
}
