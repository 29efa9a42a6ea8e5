//! Table statistics tool.
//!
//! Implements the `get_table_stats` MCP tool on top of the database's
//! SUMMARIZE output, reshaped into one entry per column.

use crate::db::Database;
use crate::error::GatewayResult;
use crate::models::ColumnStats;
use crate::tools::validate_table_name;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the get_table_stats tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableStatsInput {
    /// Name of the table to summarize
    pub table_name: String,
}

/// Output from the get_table_stats tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetTableStatsOutput {
    /// Table name
    pub table_name: String,
    /// Per-column summary statistics
    pub columns: Vec<ColumnStats>,
}

/// Handler for table statistics.
pub struct StatsToolHandler {
    db: Arc<Database>,
}

impl StatsToolHandler {
    /// Create a new stats tool handler.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Handle the get_table_stats tool call.
    pub fn stats(&self, input: GetTableStatsInput) -> GatewayResult<GetTableStatsOutput> {
        let table_name = validate_table_name(&input.table_name)?;
        let rows = self.db.summarize(table_name)?;

        let columns = rows
            .into_iter()
            .map(|mut row| {
                let mut take = |key: &str| row.remove(key).unwrap_or(JsonValue::Null);
                ColumnStats {
                    column: field_as_string(take("column_name")),
                    data_type: field_as_string(take("column_type")),
                    count: take("count"),
                    distinct: take("approx_unique"),
                    min: take("min"),
                    max: take("max"),
                    mean: take("avg"),
                    null_percentage: take("null_percentage"),
                }
            })
            .collect::<Vec<_>>();

        info!(table_name, column_count = columns.len(), "Table summarized");

        Ok(GetTableStatsOutput {
            table_name: table_name.to_string(),
            columns,
        })
    }
}

fn field_as_string(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    fn handler_with_fixture() -> StatsToolHandler {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.execute_batch(
            "CREATE TABLE metrics (name VARCHAR, score DOUBLE);
             INSERT INTO metrics VALUES ('a', 1.0), ('b', 2.0), ('c', NULL);",
        )
        .unwrap();
        StatsToolHandler::new(db)
    }

    #[test]
    fn test_stats_one_entry_per_column() {
        let handler = handler_with_fixture();
        let output = handler
            .stats(GetTableStatsInput {
                table_name: "metrics".to_string(),
            })
            .unwrap();

        assert_eq!(output.table_name, "metrics");
        assert_eq!(output.columns.len(), 2);

        let score = output
            .columns
            .iter()
            .find(|c| c.column == "score")
            .unwrap();
        assert_eq!(score.data_type, "DOUBLE");
        assert!(!score.count.is_null());
        assert!(!score.mean.is_null());
        assert!(!score.null_percentage.is_null());
    }

    #[test]
    fn test_stats_non_numeric_column_has_null_mean() {
        let handler = handler_with_fixture();
        let output = handler
            .stats(GetTableStatsInput {
                table_name: "metrics".to_string(),
            })
            .unwrap();

        let name = output.columns.iter().find(|c| c.column == "name").unwrap();
        assert!(name.mean.is_null());
        assert!(!name.distinct.is_null());
    }

    #[test]
    fn test_stats_unknown_table() {
        let handler = handler_with_fixture();
        let err = handler
            .stats(GetTableStatsInput {
                table_name: "nope".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTable { .. }));
    }

    #[test]
    fn test_stats_rejects_invalid_name() {
        let handler = handler_with_fixture();
        let err = handler
            .stats(GetTableStatsInput {
                table_name: "metrics WHERE 1=1".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput { .. }));
    }
}
