//! Single-connection DuckDB access layer.
//!
//! The gateway holds exactly one process-wide connection, created at startup
//! and kept for the process lifetime. The connection targets either a local
//! in-memory database or MotherDuck, selected by credential presence. Access
//! is synchronous behind a mutex; the gateway itself stores no table data.

use crate::config::{BackendMode, ImportConflictPolicy};
use crate::db::types::row_to_json_map;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{
    ColumnInfo, ImportOutcome, QueryPreview, SAMPLE_ROWS, TableDescription, TableSummary,
};
use duckdb::Connection;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Quote a SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The one shared handle to the analytical database.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database connection for the selected backend.
    ///
    /// Also makes a best-effort attempt to load the httpfs extension so
    /// `read_csv_auto` can fetch HTTP(S) sources; offline hosts just log
    /// a warning and keep working with local files.
    pub fn connect(backend: &BackendMode) -> GatewayResult<Self> {
        let conn = Connection::open(backend.connection_string()).map_err(|e| {
            GatewayError::connection(
                e.to_string(),
                "Check the MotherDuck token, or unset it to use an in-memory database",
            )
        })?;

        if let Err(e) = conn.execute_batch("INSTALL httpfs; LOAD httpfs;") {
            warn!(error = %e, "httpfs extension unavailable, URL imports will fail");
        }

        info!(backend = %backend, "Database connection established");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a local in-memory database (test convenience).
    pub fn open_in_memory() -> GatewayResult<Self> {
        Self::connect(&BackendMode::InMemory)
    }

    fn lock(&self) -> GatewayResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GatewayError::internal("database connection mutex poisoned"))
    }

    /// Run one or more statements, discarding any results.
    pub fn execute_batch(&self, sql: &str) -> GatewayResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a statement and return a bounded preview plus the true total
    /// row count. Rows beyond the cap are counted but never converted.
    pub fn query_with_preview(&self, sql: &str, preview_limit: usize) -> GatewayResult<QueryPreview> {
        let conn = self.lock()?;
        let start = Instant::now();
        let (columns, rows, total_rows) = fetch_rows(&conn, sql, Some(preview_limit))?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            total_rows,
            preview_rows = rows.len(),
            execution_time_ms,
            "Statement executed"
        );

        Ok(QueryPreview {
            columns,
            truncated: total_rows > rows.len(),
            rows,
            total_rows,
            execution_time_ms,
        })
    }

    /// Import a CSV source (local path or URL) into a named table.
    ///
    /// The source string must already be resolved and vetted by the caller;
    /// this method only delegates to `read_csv_auto`.
    pub fn import_csv(
        &self,
        table_name: &str,
        source: &str,
        policy: ImportConflictPolicy,
    ) -> GatewayResult<ImportOutcome> {
        let conn = self.lock()?;

        if policy == ImportConflictPolicy::Error && table_exists(&conn, table_name)? {
            return Err(GatewayError::query(
                format!("Table '{table_name}' already exists"),
                "Pick a different table name, or run the server with --on-conflict replace",
            ));
        }

        let create = match policy {
            ImportConflictPolicy::Replace => "CREATE OR REPLACE TABLE",
            ImportConflictPolicy::Error => "CREATE TABLE",
        };
        let sql = format!(
            "{create} {} AS SELECT * FROM read_csv_auto({})",
            quote_ident(table_name),
            quote_literal(source)
        );
        conn.execute_batch(&sql)?;

        let row_count = count_rows(&conn, table_name)?;
        let columns = describe_columns(&conn, table_name)?
            .into_iter()
            .map(|c| c.name)
            .collect();

        Ok(ImportOutcome {
            table_name: table_name.to_string(),
            row_count,
            columns,
        })
    }

    /// List all loaded tables with row and column counts.
    pub fn list_tables(&self) -> GatewayResult<Vec<TableSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SHOW TABLES")?;
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let row_count = count_rows(&conn, &name)?;
            let column_count = describe_columns(&conn, &name)?.len();
            tables.push(TableSummary {
                name,
                row_count,
                column_count,
            });
        }
        Ok(tables)
    }

    /// Whether a table with this exact name is loaded.
    pub fn table_exists(&self, table_name: &str) -> GatewayResult<bool> {
        let conn = self.lock()?;
        table_exists(&conn, table_name)
    }

    /// Schema, row count, and a small data sample for one table.
    ///
    /// Callers are expected to have checked existence already; a vanished
    /// table still comes back as UnknownTable rather than a raw query error.
    pub fn describe_table(&self, table_name: &str) -> GatewayResult<TableDescription> {
        let conn = self.lock()?;

        if !table_exists(&conn, table_name)? {
            return Err(GatewayError::unknown_table(table_name));
        }

        let columns = describe_columns(&conn, table_name)?;
        let row_count = count_rows(&conn, table_name)?;
        let sample_sql = format!(
            "SELECT * FROM {} LIMIT {SAMPLE_ROWS}",
            quote_ident(table_name)
        );
        let (_, sample_rows, _) = fetch_rows(&conn, &sample_sql, Some(SAMPLE_ROWS))?;

        Ok(TableDescription {
            table_name: table_name.to_string(),
            row_count,
            columns,
            sample_rows,
        })
    }

    /// Execute a query and write its full result set to a CSV file.
    /// Returns the number of exported data rows.
    pub fn export_csv(&self, sql: &str, path: &Path) -> GatewayResult<u64> {
        let conn = self.lock()?;

        // Trailing semicolons would break the wrapping statements below
        let sql = sql.trim().trim_end_matches(';');

        // Count first so the reported total does not depend on what the
        // COPY statement chooses to return.
        let count_sql = format!("SELECT count(*) FROM ({sql})");
        let row_count: i64 = conn.query_row(&count_sql, [], |row| row.get(0))?;

        let copy_sql = format!(
            "COPY ({sql}) TO {} (HEADER, DELIMITER ',')",
            quote_literal(&path.to_string_lossy())
        );
        conn.execute_batch(&copy_sql)?;

        Ok(row_count as u64)
    }

    /// Per-column SUMMARIZE statistics as raw JSON rows.
    pub fn summarize(&self, table_name: &str) -> GatewayResult<Vec<serde_json::Map<String, JsonValue>>> {
        let conn = self.lock()?;

        if !table_exists(&conn, table_name)? {
            return Err(GatewayError::unknown_table(table_name));
        }

        let sql = format!("SUMMARIZE {}", quote_ident(table_name));
        let (_, rows, _) = fetch_rows(&conn, &sql, None)?;
        Ok(rows)
    }
}

/// Run a statement, converting up to `limit` rows to JSON while counting all
/// of them. Returns (column names, converted rows, total row count).
fn fetch_rows(
    conn: &Connection,
    sql: &str,
    limit: Option<usize>,
) -> GatewayResult<(Vec<String>, Vec<serde_json::Map<String, JsonValue>>, usize)> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;

    let columns: Vec<String> = rows
        .as_ref()
        .map(|s| s.column_names().iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let mut converted = Vec::new();
    let mut total = 0usize;
    while let Some(row) = rows.next()? {
        if limit.is_none_or(|cap| total < cap) {
            converted.push(row_to_json_map(row, &columns)?);
        }
        total += 1;
    }
    Ok((columns, converted, total))
}

fn table_exists(conn: &Connection, table_name: &str) -> GatewayResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn count_rows(conn: &Connection, table_name: &str) -> GatewayResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT count(*) FROM {}", quote_ident(table_name)),
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Column layout from DESCRIBE: name, type, and nullability.
fn describe_columns(conn: &Connection, table_name: &str) -> GatewayResult<Vec<ColumnInfo>> {
    let sql = format!("DESCRIBE {}", quote_ident(table_name));
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
                nullable: row.get::<_, String>(2)? == "YES",
            })
        })?
        .collect::<Result<_, _>>()?;
    Ok(columns)
}
