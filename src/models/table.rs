//! Table-related data models.
//!
//! These are the shapes the database layer hands back to the tool handlers;
//! the handlers convert them into the declared MCP output types. Table data
//! itself always lives in the database, never in the gateway.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One loaded table with its basic dimensions, as shown by list_tables.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSummary {
    /// Table name
    pub name: String,
    /// Number of data rows
    pub row_count: u64,
    /// Number of columns
    pub column_count: usize,
}

/// A single column as reported by DESCRIBE.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Database-inferred type (e.g. "BIGINT", "VARCHAR", "DOUBLE")
    pub data_type: String,
    /// Whether the column accepts NULLs
    pub nullable: bool,
}

/// Full schema description of one table plus a small data sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescription {
    pub table_name: String,
    pub row_count: u64,
    pub columns: Vec<ColumnInfo>,
    pub sample_rows: Vec<serde_json::Map<String, JsonValue>>,
}

/// Result of a completed CSV import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub table_name: String,
    pub row_count: u64,
    pub columns: Vec<String>,
}

/// Per-column summary statistics from SUMMARIZE.
///
/// min/max/mean keep whatever JSON type the database reports (numbers for
/// numeric columns, strings otherwise); mean is null for non-numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnStats {
    /// Column name
    pub column: String,
    /// Column type as reported by the database
    pub data_type: String,
    /// Non-null value count
    pub count: JsonValue,
    /// Approximate distinct value count
    pub distinct: JsonValue,
    /// Minimum value
    pub min: JsonValue,
    /// Maximum value
    pub max: JsonValue,
    /// Mean, numeric columns only
    pub mean: JsonValue,
    /// Percentage of NULL values
    pub null_percentage: JsonValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_summary_serialization() {
        let summary = TableSummary {
            name: "sales".to_string(),
            row_count: 120,
            column_count: 4,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"row_count\":120"));
        assert!(json.contains("\"column_count\":4"));
    }

    #[test]
    fn test_column_stats_holds_mixed_types() {
        let stats = ColumnStats {
            column: "price".to_string(),
            data_type: "DOUBLE".to_string(),
            count: JsonValue::from(100),
            distinct: JsonValue::from(37),
            min: JsonValue::from(0.5),
            max: JsonValue::from(99.9),
            mean: JsonValue::from(12.3),
            null_percentage: JsonValue::from(0.0),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["column"], "price");
        assert_eq!(json["distinct"], 37);
    }
}
