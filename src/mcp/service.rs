//! MCP service implementation using rmcp.
//!
//! This module defines the AnalystService struct with all data-analysis
//! tools exposed via the MCP protocol using the rmcp framework's macros.
//! Database access is synchronous; every tool call runs on the blocking
//! thread pool so the async executor never stalls behind a long query.

use crate::config::ImportConflictPolicy;
use crate::db::Database;
use crate::error::GatewayResult;
use crate::tools::export::{
    ExportQueryResultsInput, ExportQueryResultsOutput, ExportToolHandler,
};
use crate::tools::import::{ImportCsvInput, ImportCsvOutput, ImportToolHandler};
use crate::tools::query::{QueryDataInput, QueryDataOutput, QueryToolHandler};
use crate::tools::schema::{
    DescribeTableInput, DescribeTableOutput, ListTablesOutput, SchemaToolHandler,
};
use crate::tools::stats::{GetTableStatsInput, GetTableStatsOutput, StatsToolHandler};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalystService {
    /// Shared handle to the single analytical database connection
    db: Arc<Database>,
    /// Mounted directory for CSV imports and exports
    data_dir: PathBuf,
    /// Default preview row cap for query_data
    preview_limit: u32,
    /// What import_csv does when the target table already exists
    on_conflict: ImportConflictPolicy,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

/// Run a synchronous tool handler on the blocking pool and shape the result.
async fn run_blocking<T, F>(work: F) -> Result<Json<T>, McpError>
where
    T: Send + 'static,
    F: FnOnce() -> GatewayResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map(Json).map_err(McpError::from),
        Err(join_err) => Err(McpError::internal_error(
            format!("Tool worker failed: {join_err}"),
            None,
        )),
    }
}

impl AnalystService {
    /// Create a new AnalystService instance.
    ///
    /// # Arguments
    ///
    /// * `db` - Shared database handle for all tool calls
    /// * `data_dir` - Mounted directory that bounds local imports and exports
    /// * `preview_limit` - Default preview row cap for query_data
    /// * `on_conflict` - Import behavior when a table name is already taken
    pub fn new(
        db: Arc<Database>,
        data_dir: PathBuf,
        preview_limit: u32,
        on_conflict: ImportConflictPolicy,
    ) -> Self {
        Self {
            db,
            data_dir,
            preview_limit,
            on_conflict,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl AnalystService {
    #[tool(
        description = "Import a CSV file into a new database table.\nAccepts a local path inside the data directory, an HTTP(S) URL, or a Google Sheets share link (converted to a CSV export link automatically).\nColumn names and types are inferred from the data."
    )]
    async fn import_csv(
        &self,
        Parameters(input): Parameters<ImportCsvInput>,
    ) -> Result<Json<ImportCsvOutput>, McpError> {
        let handler =
            ImportToolHandler::new(self.db.clone(), self.data_dir.clone(), self.on_conflict);
        run_blocking(move || handler.import(input)).await
    }

    #[tool(
        description = "Execute a read-only SQL query and return a preview of the results.\nWrite statements (INSERT/UPDATE/DELETE/DDL) are rejected; use import_csv to load data.\nThe response reports the true total row count even when the preview is truncated.\nOutput format: json (default), table, or markdown."
    )]
    async fn query_data(
        &self,
        Parameters(input): Parameters<QueryDataInput>,
    ) -> Result<Json<QueryDataOutput>, McpError> {
        let handler = QueryToolHandler::with_default_limit(self.db.clone(), self.preview_limit);
        run_blocking(move || handler.query(input)).await
    }

    #[tool(
        description = "List all tables currently loaded in the database.\nReturns each table's name, row count, and column count."
    )]
    async fn list_tables(&self) -> Result<Json<ListTablesOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.db.clone());
        run_blocking(move || handler.list_tables()).await
    }

    #[tool(
        description = "Get the schema of a table.\nReturns column names, types, nullability, total row count, and a few sample rows."
    )]
    async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<Json<DescribeTableOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.db.clone());
        run_blocking(move || handler.describe_table(input)).await
    }

    #[tool(
        description = "Run a read-only SQL query and write the full result set to a CSV file.\nThe destination path is relative to the data directory.\nUse this instead of query_data when the complete results are needed."
    )]
    async fn export_query_results(
        &self,
        Parameters(input): Parameters<ExportQueryResultsInput>,
    ) -> Result<Json<ExportQueryResultsOutput>, McpError> {
        let handler = ExportToolHandler::new(self.db.clone(), self.data_dir.clone());
        run_blocking(move || handler.export(input)).await
    }

    #[tool(
        description = "Get summary statistics for every column of a table.\nReturns count, approximate distinct count, min, max, mean (numeric columns), and null percentage."
    )]
    async fn get_table_stats(
        &self,
        Parameters(input): Parameters<GetTableStatsInput>,
    ) -> Result<Json<GetTableStatsOutput>, McpError> {
        let handler = StatsToolHandler::new(self.db.clone());
        run_blocking(move || handler.stats(input)).await
    }
}

#[tool_handler]
impl ServerHandler for AnalystService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "data-analyst-mcp".to_owned(),
                title: Some("Data Analyst MCP Gateway".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Data analysis tools backed by an analytical SQL database.\n\
                \n\
                ## Workflow\n\
                1. Call `import_csv` to load CSV data (local file, URL, or Google Sheets link) into a table\n\
                2. Call `list_tables` / `describe_table` to explore what is loaded\n\
                3. Call `query_data` with SELECT statements to analyze; previews are capped but report the true total\n\
                4. Call `get_table_stats` for per-column summary statistics\n\
                5. Call `export_query_results` to save complete results as CSV\n\
                \n\
                All queries are read-only. Loading data is only possible through import_csv."
                    .to_owned(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConflictPolicy;

    fn service() -> AnalystService {
        let db = Arc::new(Database::open_in_memory().unwrap());
        AnalystService::new(
            db,
            PathBuf::from("./data"),
            100,
            ImportConflictPolicy::Replace,
        )
    }

    #[test]
    fn test_server_info_advertises_tools() {
        let info = service().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "data-analyst-mcp");
        assert!(info.instructions.unwrap().contains("import_csv"));
    }

    #[tokio::test]
    async fn test_query_data_roundtrip() {
        let svc = service();
        let result = svc
            .query_data(Parameters(QueryDataInput {
                sql: "SELECT 1 AS one".to_string(),
                limit: None,
                format: Default::default(),
            }))
            .await
            .unwrap();
        assert_eq!(result.0.row_count, 1);
        assert_eq!(result.0.rows[0]["one"], serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_write_statement_maps_to_invalid_params() {
        let svc = service();
        let err = svc
            .query_data(Parameters(QueryDataInput {
                sql: "CREATE TABLE t (x INTEGER)".to_string(),
                limit: None,
                format: Default::default(),
            }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_unknown_table_maps_to_resource_not_found() {
        let svc = service();
        let err = svc
            .describe_table(Parameters(DescribeTableInput {
                table_name: "missing".to_string(),
            }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.code.0, -32002);
    }
}
