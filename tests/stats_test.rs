//! Integration tests for get_table_stats.
//!
//! Verifies the per-column statistics shape over numeric, text, and
//! null-heavy columns.

use data_analyst_mcp::db::Database;
use data_analyst_mcp::error::GatewayError;
use data_analyst_mcp::tools::stats::{GetTableStatsInput, StatsToolHandler};
use std::sync::Arc;

fn setup_handler() -> StatsToolHandler {
    let db = Arc::new(Database::open_in_memory().unwrap());
    db.execute_batch(
        "CREATE TABLE trades (symbol VARCHAR, price DOUBLE, volume BIGINT);
         INSERT INTO trades VALUES
             ('AAPL', 189.50, 1000),
             ('AAPL', 190.25, 500),
             ('MSFT', 410.00, 2000),
             ('GOOG', NULL, 300);",
    )
    .unwrap();
    StatsToolHandler::new(db)
}

#[test]
fn test_stats_covers_every_column() {
    let handler = setup_handler();
    let output = handler
        .stats(GetTableStatsInput {
            table_name: "trades".to_string(),
        })
        .unwrap();

    assert_eq!(output.table_name, "trades");
    let names: Vec<&str> = output.columns.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(names, vec!["symbol", "price", "volume"]);
}

#[test]
fn test_stats_numeric_column_reports_range_and_mean() {
    let handler = setup_handler();
    let output = handler
        .stats(GetTableStatsInput {
            table_name: "trades".to_string(),
        })
        .unwrap();

    let volume = output
        .columns
        .iter()
        .find(|c| c.column == "volume")
        .unwrap();
    assert_eq!(volume.data_type, "BIGINT");
    assert!(!volume.min.is_null());
    assert!(!volume.max.is_null());
    assert!(!volume.mean.is_null());
    assert!(!volume.distinct.is_null());
}

#[test]
fn test_stats_text_column_has_no_mean() {
    let handler = setup_handler();
    let output = handler
        .stats(GetTableStatsInput {
            table_name: "trades".to_string(),
        })
        .unwrap();

    let symbol = output
        .columns
        .iter()
        .find(|c| c.column == "symbol")
        .unwrap();
    assert_eq!(symbol.data_type, "VARCHAR");
    assert!(symbol.mean.is_null());
}

#[test]
fn test_stats_null_percentage_present() {
    let handler = setup_handler();
    let output = handler
        .stats(GetTableStatsInput {
            table_name: "trades".to_string(),
        })
        .unwrap();

    let price = output.columns.iter().find(|c| c.column == "price").unwrap();
    assert!(!price.null_percentage.is_null());
}

#[test]
fn test_stats_unknown_table_maps_to_unknown_table() {
    let handler = setup_handler();
    let err = handler
        .stats(GetTableStatsInput {
            table_name: "phantom".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnknownTable { .. }));
}
