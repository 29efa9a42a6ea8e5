//! Integration tests for table discovery and inspection.
//!
//! Covers list_tables and describe_table over tables created through a real
//! CSV import, so the whole import-then-inspect flow is exercised.

use data_analyst_mcp::config::ImportConflictPolicy;
use data_analyst_mcp::db::Database;
use data_analyst_mcp::error::GatewayError;
use data_analyst_mcp::tools::import::{ImportCsvInput, ImportToolHandler};
use data_analyst_mcp::tools::schema::{DescribeTableInput, SchemaToolHandler};
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (TempDir, Arc<Database>) {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("people.csv")).unwrap();
    writeln!(file, "name,age,active").unwrap();
    writeln!(file, "ada,36,true").unwrap();
    writeln!(file, "grace,45,false").unwrap();

    let db = Arc::new(Database::open_in_memory().unwrap());
    let importer = ImportToolHandler::new(
        db.clone(),
        dir.path().to_path_buf(),
        ImportConflictPolicy::Replace,
    );
    importer
        .import(ImportCsvInput {
            source: "people.csv".to_string(),
            table_name: "people".to_string(),
        })
        .unwrap();
    (dir, db)
}

#[test]
fn test_list_tables_after_import() {
    let (_dir, db) = setup();
    let handler = SchemaToolHandler::new(db);

    let output = handler.list_tables().unwrap();
    assert_eq!(output.table_count, 1);
    assert_eq!(output.tables[0].name, "people");
    assert_eq!(output.tables[0].row_count, 2);
    assert_eq!(output.tables[0].column_count, 3);
}

#[test]
fn test_list_tables_sees_every_import() {
    let (dir, db) = setup();
    let importer = ImportToolHandler::new(
        db.clone(),
        dir.path().to_path_buf(),
        ImportConflictPolicy::Replace,
    );
    importer
        .import(ImportCsvInput {
            source: "people.csv".to_string(),
            table_name: "people_copy".to_string(),
        })
        .unwrap();

    let output = SchemaToolHandler::new(db).list_tables().unwrap();
    assert_eq!(output.table_count, 2);
    let mut names: Vec<&str> = output.tables.iter().map(|t| t.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["people", "people_copy"]);
}

#[test]
fn test_describe_table_types_inferred_from_csv() {
    let (_dir, db) = setup();
    let handler = SchemaToolHandler::new(db);

    let output = handler
        .describe_table(DescribeTableInput {
            table_name: "people".to_string(),
        })
        .unwrap();

    assert_eq!(output.row_count, 2);
    let names: Vec<&str> = output.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["name", "age", "active"]);

    let age = &output.columns[1];
    assert!(age.data_type.contains("INT"), "age type: {}", age.data_type);
    assert_eq!(output.columns[2].data_type, "BOOLEAN");
}

#[test]
fn test_describe_table_sample_rows_capped() {
    let (_dir, db) = setup();
    db.execute_batch("CREATE TABLE wide AS SELECT * FROM range(100) t(i)")
        .unwrap();

    let output = SchemaToolHandler::new(db)
        .describe_table(DescribeTableInput {
            table_name: "wide".to_string(),
        })
        .unwrap();
    assert_eq!(output.row_count, 100);
    assert_eq!(output.sample_rows.len(), 5);
}

#[test]
fn test_describe_unknown_table_suggests_list_tables() {
    let (_dir, db) = setup();
    let err = SchemaToolHandler::new(db)
        .describe_table(DescribeTableInput {
            table_name: "ghosts".to_string(),
        })
        .unwrap_err();

    assert!(matches!(err, GatewayError::UnknownTable { .. }));
    assert!(err.to_string().contains("ghosts"));
    assert!(err.suggestion().unwrap().contains("list_tables"));
}
