//! SQL statement validation for read-only enforcement.
//!
//! The gateway mutates the database through exactly one path, `import_csv`.
//! Everything that takes raw SQL (`query_data`, `export_query_results`) must
//! stay read-only, so statements are parsed with
//! [sqlparser](https://docs.rs/sqlparser/) (DuckDB dialect) and anything that
//! is not a SELECT-class statement is rejected before it reaches the engine.

use crate::error::{GatewayError, GatewayResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

/// Type of SQL statement detected by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlStatementType {
    /// SELECT and other read-only queries (SELECT, SHOW, DESCRIBE, VALUES)
    Select,
    /// INSERT, UPDATE, DELETE, MERGE, COPY
    DmlWrite,
    /// CREATE, DROP, ALTER, TRUNCATE
    Ddl,
    /// BEGIN, COMMIT, ROLLBACK, SAVEPOINT
    Transaction,
    /// CALL, EXECUTE, PREPARE
    ProcedureCall,
    /// SET, USE, PRAGMA, ATTACH, INSTALL, VACUUM, ...
    Administrative,
    /// Unknown statement
    Unknown,
}

/// Error messages for each blocked statement category.
mod error_messages {
    pub const DML_WRITE: &str =
        "Write operations are not allowed. The gateway only mutates data through import_csv.";
    pub const DDL: &str =
        "Schema modifications are not allowed. Tables are created through import_csv.";
    pub const TRANSACTION: &str = "Transaction control statements are not allowed.";
    pub const PROCEDURE: &str = "Procedure calls are not allowed.";
    pub const ADMINISTRATIVE: &str = "Administrative statements are not allowed.";
    pub const UNKNOWN: &str = "Unrecognized SQL statement. Only read-only queries are allowed.";
}

/// Validate SQL for read-only execution.
///
/// Returns `Ok(())` if every statement is read-only (SELECT, SHOW, DESCRIBE,
/// EXPLAIN of a SELECT, ...), `Err(GatewayError::NotPermitted)` for writes,
/// and `Err(GatewayError::Query)` when the SQL does not parse at all.
///
/// # Examples
///
/// ```
/// use data_analyst_mcp::tools::sql_validator::validate_readonly;
///
/// assert!(validate_readonly("SELECT * FROM sales").is_ok());
/// assert!(validate_readonly("DROP TABLE sales").is_err());
/// ```
pub fn validate_readonly(sql: &str) -> GatewayResult<()> {
    let statements = Parser::parse_sql(&DuckDbDialect {}, sql).map_err(|e| {
        GatewayError::query(
            format!("Failed to parse SQL statement: {e}"),
            "Check the SQL syntax",
        )
    })?;

    if statements.is_empty() {
        return Err(GatewayError::invalid_input("Empty SQL statement"));
    }

    for stmt in &statements {
        validate_statement(stmt)?;
    }

    Ok(())
}

fn validate_statement(stmt: &Statement) -> GatewayResult<()> {
    let (stmt_type, operation) = classify_statement(stmt);

    let reason = match stmt_type {
        SqlStatementType::Select => return Ok(()),
        SqlStatementType::DmlWrite => error_messages::DML_WRITE,
        SqlStatementType::Ddl => error_messages::DDL,
        SqlStatementType::Transaction => error_messages::TRANSACTION,
        SqlStatementType::ProcedureCall => error_messages::PROCEDURE,
        SqlStatementType::Administrative => error_messages::ADMINISTRATIVE,
        SqlStatementType::Unknown => error_messages::UNKNOWN,
    };
    Err(GatewayError::not_permitted(operation, reason))
}

/// Classify a parsed statement into a statement type.
fn classify_statement(stmt: &Statement) -> (SqlStatementType, &'static str) {
    match stmt {
        // Read-only operations - allowed
        Statement::Query(_) => (SqlStatementType::Select, "SELECT"),
        Statement::ShowTables { .. } => (SqlStatementType::Select, "SHOW TABLES"),
        Statement::ShowColumns { .. } => (SqlStatementType::Select, "SHOW COLUMNS"),
        Statement::ShowDatabases { .. } => (SqlStatementType::Select, "SHOW DATABASES"),
        Statement::ShowSchemas { .. } => (SqlStatementType::Select, "SHOW SCHEMAS"),
        Statement::ShowCreate { .. } => (SqlStatementType::Select, "SHOW CREATE"),
        Statement::ShowVariable { .. } => (SqlStatementType::Select, "SHOW VARIABLE"),
        Statement::ExplainTable { .. } => (SqlStatementType::Select, "EXPLAIN TABLE"),

        // EXPLAIN is read-only iff the statement under it is
        Statement::Explain { statement, .. } => {
            let (inner_type, inner_name) = classify_statement(statement);
            if inner_type == SqlStatementType::Select {
                (SqlStatementType::Select, "EXPLAIN")
            } else {
                (inner_type, inner_name)
            }
        }

        // DML writes - blocked
        Statement::Insert(_) => (SqlStatementType::DmlWrite, "INSERT"),
        Statement::Update { .. } => (SqlStatementType::DmlWrite, "UPDATE"),
        Statement::Delete(_) => (SqlStatementType::DmlWrite, "DELETE"),
        Statement::Merge { .. } => (SqlStatementType::DmlWrite, "MERGE"),
        Statement::Copy { .. } => (SqlStatementType::DmlWrite, "COPY"),

        // DDL - blocked
        Statement::CreateTable { .. } => (SqlStatementType::Ddl, "CREATE TABLE"),
        Statement::CreateView { .. } => (SqlStatementType::Ddl, "CREATE VIEW"),
        Statement::CreateIndex(_) => (SqlStatementType::Ddl, "CREATE INDEX"),
        Statement::CreateSchema { .. } => (SqlStatementType::Ddl, "CREATE SCHEMA"),
        Statement::CreateDatabase { .. } => (SqlStatementType::Ddl, "CREATE DATABASE"),
        Statement::CreateSecret { .. } => (SqlStatementType::Ddl, "CREATE SECRET"),
        Statement::CreateVirtualTable { .. } => (SqlStatementType::Ddl, "CREATE VIRTUAL TABLE"),
        Statement::AlterTable { .. } => (SqlStatementType::Ddl, "ALTER TABLE"),
        Statement::AlterView { .. } => (SqlStatementType::Ddl, "ALTER VIEW"),
        Statement::Drop { .. } => (SqlStatementType::Ddl, "DROP"),
        Statement::DropFunction { .. } => (SqlStatementType::Ddl, "DROP FUNCTION"),
        Statement::DropSecret { .. } => (SqlStatementType::Ddl, "DROP SECRET"),
        Statement::Truncate { .. } => (SqlStatementType::Ddl, "TRUNCATE"),

        // Transaction control - blocked (the gateway has no transactions)
        Statement::StartTransaction { .. } => (SqlStatementType::Transaction, "BEGIN"),
        Statement::Commit { .. } => (SqlStatementType::Transaction, "COMMIT"),
        Statement::Rollback { .. } => (SqlStatementType::Transaction, "ROLLBACK"),
        Statement::Savepoint { .. } => (SqlStatementType::Transaction, "SAVEPOINT"),
        Statement::ReleaseSavepoint { .. } => (SqlStatementType::Transaction, "RELEASE SAVEPOINT"),

        // Procedure/prepared-statement machinery - blocked
        Statement::Call { .. } => (SqlStatementType::ProcedureCall, "CALL"),
        Statement::Execute { .. } => (SqlStatementType::ProcedureCall, "EXECUTE"),
        Statement::Prepare { .. } => (SqlStatementType::ProcedureCall, "PREPARE"),
        Statement::Deallocate { .. } => (SqlStatementType::ProcedureCall, "DEALLOCATE"),

        // Administrative operations - blocked
        Statement::Set(_) => (SqlStatementType::Administrative, "SET"),
        Statement::Use(_) => (SqlStatementType::Administrative, "USE"),
        Statement::Pragma { .. } => (SqlStatementType::Administrative, "PRAGMA"),
        Statement::Vacuum { .. } => (SqlStatementType::Administrative, "VACUUM"),
        Statement::Analyze { .. } => (SqlStatementType::Administrative, "ANALYZE"),
        Statement::Install { .. } => (SqlStatementType::Administrative, "INSTALL"),
        Statement::Load { .. } => (SqlStatementType::Administrative, "LOAD"),
        Statement::AttachDatabase { .. } => (SqlStatementType::Administrative, "ATTACH"),
        Statement::AttachDuckDBDatabase { .. } => (SqlStatementType::Administrative, "ATTACH"),
        Statement::DetachDuckDBDatabase { .. } => (SqlStatementType::Administrative, "DETACH"),

        // Everything else - blocked (conservative)
        _ => (SqlStatementType::Unknown, "Unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_ok() {
        assert!(validate_readonly("SELECT * FROM sales").is_ok());
    }

    #[test]
    fn test_select_with_cte_and_window_ok() {
        let sql = r#"
            WITH ranked AS (
                SELECT region, amount,
                       row_number() OVER (PARTITION BY region ORDER BY amount DESC) AS rn
                FROM sales
            )
            SELECT * FROM ranked WHERE rn <= 3
        "#;
        assert!(validate_readonly(sql).is_ok());
    }

    #[test]
    fn test_union_ok() {
        assert!(validate_readonly("SELECT a FROM t1 UNION ALL SELECT b FROM t2").is_ok());
    }

    #[test]
    fn test_explain_select_ok() {
        assert!(validate_readonly("EXPLAIN SELECT * FROM sales").is_ok());
    }

    #[test]
    fn test_insert_blocked() {
        let err = validate_readonly("INSERT INTO sales VALUES (1)").unwrap_err();
        assert!(matches!(err, GatewayError::NotPermitted { .. }));
        assert!(err.to_string().contains("import_csv"));
    }

    #[test]
    fn test_update_blocked() {
        assert!(matches!(
            validate_readonly("UPDATE sales SET amount = 0").unwrap_err(),
            GatewayError::NotPermitted { .. }
        ));
    }

    #[test]
    fn test_delete_blocked() {
        assert!(matches!(
            validate_readonly("DELETE FROM sales").unwrap_err(),
            GatewayError::NotPermitted { .. }
        ));
    }

    #[test]
    fn test_ddl_blocked() {
        assert!(validate_readonly("CREATE TABLE t (id INT)").is_err());
        assert!(validate_readonly("DROP TABLE sales").is_err());
        assert!(validate_readonly("ALTER TABLE sales ADD COLUMN x INT").is_err());
    }

    #[test]
    fn test_explain_write_blocked() {
        assert!(validate_readonly("EXPLAIN DELETE FROM sales").is_err());
    }

    #[test]
    fn test_multiple_statements_any_write_blocks_all() {
        assert!(validate_readonly("SELECT 1; INSERT INTO sales VALUES (1)").is_err());
    }

    #[test]
    fn test_insert_select_blocked() {
        assert!(validate_readonly("INSERT INTO archive SELECT * FROM sales").is_err());
    }

    #[test]
    fn test_transaction_control_blocked() {
        assert!(validate_readonly("BEGIN").is_err());
        assert!(validate_readonly("COMMIT").is_err());
    }

    #[test]
    fn test_attach_blocked() {
        assert!(validate_readonly("ATTACH 'other.db' AS other").is_err());
    }

    #[test]
    fn test_parse_error_is_query_error() {
        let err = validate_readonly("SELEC * FRM").unwrap_err();
        assert!(matches!(err, GatewayError::Query { .. }));
    }

    #[test]
    fn test_empty_sql_rejected() {
        assert!(validate_readonly("").is_err());
        assert!(validate_readonly("   ;  ").is_err());
    }
}
