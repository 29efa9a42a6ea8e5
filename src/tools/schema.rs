//! Table discovery and inspection tools.
//!
//! Implements the `list_tables` and `describe_table` MCP tools.

use crate::db::Database;
use crate::error::GatewayResult;
use crate::models::{ColumnInfo, TableSummary};
use crate::tools::validate_table_name;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    /// Loaded tables with their dimensions
    pub tables: Vec<TableSummary>,
    /// Number of tables
    pub table_count: usize,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the table to describe
    pub table_name: String,
}

/// Output from the describe_table tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DescribeTableOutput {
    /// Table name
    pub table_name: String,
    /// Total number of rows
    pub row_count: u64,
    /// Column definitions
    pub columns: Vec<ColumnInfo>,
    /// First few rows of data
    pub sample_rows: Vec<serde_json::Map<String, JsonValue>>,
}

/// Handler for schema inspection.
pub struct SchemaToolHandler {
    db: Arc<Database>,
}

impl SchemaToolHandler {
    /// Create a new schema tool handler.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Handle the list_tables tool call.
    pub fn list_tables(&self) -> GatewayResult<ListTablesOutput> {
        let tables = self.db.list_tables()?;
        let table_count = tables.len();
        info!(table_count, "Tables listed");
        Ok(ListTablesOutput {
            tables,
            table_count,
        })
    }

    /// Handle the describe_table tool call.
    pub fn describe_table(&self, input: DescribeTableInput) -> GatewayResult<DescribeTableOutput> {
        let table_name = validate_table_name(&input.table_name)?;
        let description = self.db.describe_table(table_name)?;
        info!(
            table_name = %description.table_name,
            row_count = description.row_count,
            column_count = description.columns.len(),
            "Table described"
        );
        Ok(DescribeTableOutput {
            table_name: description.table_name,
            row_count: description.row_count,
            columns: description.columns,
            sample_rows: description.sample_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    fn handler_with_fixture() -> SchemaToolHandler {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.execute_batch(
            "CREATE TABLE orders (id INTEGER, customer VARCHAR, total DOUBLE);
             INSERT INTO orders VALUES (1, 'alice', 9.5), (2, 'bob', 12.0);",
        )
        .unwrap();
        SchemaToolHandler::new(db)
    }

    #[test]
    fn test_list_tables_reports_dimensions() {
        let handler = handler_with_fixture();
        let output = handler.list_tables().unwrap();

        assert_eq!(output.table_count, 1);
        assert_eq!(output.tables[0].name, "orders");
        assert_eq!(output.tables[0].row_count, 2);
        assert_eq!(output.tables[0].column_count, 3);
    }

    #[test]
    fn test_list_tables_empty_database() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let output = SchemaToolHandler::new(db).list_tables().unwrap();
        assert_eq!(output.table_count, 0);
        assert!(output.tables.is_empty());
    }

    #[test]
    fn test_describe_table_returns_columns_and_sample() {
        let handler = handler_with_fixture();
        let output = handler
            .describe_table(DescribeTableInput {
                table_name: "orders".to_string(),
            })
            .unwrap();

        assert_eq!(output.table_name, "orders");
        assert_eq!(output.row_count, 2);
        assert_eq!(output.columns.len(), 3);
        assert_eq!(output.columns[1].name, "customer");
        assert_eq!(output.sample_rows.len(), 2);
        assert_eq!(output.sample_rows[0]["customer"], "alice");
    }

    #[test]
    fn test_describe_unknown_table() {
        let handler = handler_with_fixture();
        let err = handler
            .describe_table(DescribeTableInput {
                table_name: "missing".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTable { .. }));
        assert!(err.suggestion().unwrap().contains("list_tables"));
    }

    #[test]
    fn test_describe_rejects_invalid_name() {
        let handler = handler_with_fixture();
        let err = handler
            .describe_table(DescribeTableInput {
                table_name: "orders; DROP TABLE orders".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput { .. }));
    }
}
