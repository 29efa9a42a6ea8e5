//! Error types for the Data Analyst MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Each error variant carries a message that helps AI assistants understand and
//! recover from the failure; nothing propagates as an uncaught fault to the host.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid import source: {message}")]
    InvalidSource { message: String, suggestion: String },

    #[error("Operation not permitted: {operation} - {reason}")]
    NotPermitted { operation: String, reason: String },

    #[error("Query failed: {message}")]
    Query { message: String, suggestion: String },

    #[error("Unknown table: '{table}'")]
    UnknownTable { table: String },

    #[error("I/O error: {message}")]
    Io { message: String, suggestion: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create an invalid-source error with a helpful suggestion.
    pub fn invalid_source(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a not-permitted error.
    pub fn not_permitted(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotPermitted {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a query error with a suggestion.
    pub fn query(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an unknown-table error.
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable {
            table: table.into(),
        }
    }

    /// Create an I/O error with a suggestion.
    pub fn io(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a connection error with a suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidSource { suggestion, .. } => Some(suggestion),
            Self::Query { suggestion, .. } => Some(suggestion),
            Self::Io { suggestion, .. } => Some(suggestion),
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::UnknownTable { .. } => Some("Call list_tables to see the loaded tables"),
            _ => None,
        }
    }
}

/// Convert duckdb errors to GatewayError.
///
/// The database's own message is surfaced verbatim; the gateway adds only a
/// generic suggestion since DuckDB error text is already actionable.
impl From<duckdb::Error> for GatewayError {
    fn from(err: duckdb::Error) -> Self {
        GatewayError::query(
            err.to_string(),
            "Check the SQL syntax and referenced tables/columns",
        )
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::io(
            err.to_string(),
            "Check that the path exists and is writable inside the data directory",
        )
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert GatewayError to MCP ErrorData for semantic error categorization.
/// Includes the suggestion field in the `data` object when available.
impl From<GatewayError> for rmcp::ErrorData {
    fn from(err: GatewayError) -> Self {
        match &err {
            // Caller mistakes -> invalid_params
            GatewayError::InvalidSource { .. }
            | GatewayError::NotPermitted { .. }
            | GatewayError::Query { .. }
            | GatewayError::InvalidInput { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), suggestion_data(err.suggestion()))
            }

            // Missing table -> resource_not_found
            GatewayError::UnknownTable { .. } => rmcp::ErrorData::resource_not_found(
                err.to_string(),
                suggestion_data(err.suggestion()),
            ),

            // Environment/infrastructure failures -> internal_error
            GatewayError::Io { .. }
            | GatewayError::Connection { .. }
            | GatewayError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::invalid_source("no such file: a.csv", "Check the path");
        assert!(err.to_string().contains("Invalid import source"));
    }

    #[test]
    fn test_error_suggestion() {
        let err = GatewayError::query("Parser Error: syntax error", "Check SQL syntax");
        assert_eq!(err.suggestion(), Some("Check SQL syntax"));
    }

    #[test]
    fn test_unknown_table_suggestion_points_to_list_tables() {
        let err = GatewayError::unknown_table("missing");
        assert!(err.suggestion().unwrap().contains("list_tables"));
    }

    // Tests for From<GatewayError> for rmcp::ErrorData

    #[test]
    fn test_invalid_source_maps_to_invalid_params() {
        let err = GatewayError::invalid_source("bad url", "fix it");
        let mcp_err: rmcp::ErrorData = err.into();
        // invalid_params uses -32602
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_not_permitted_maps_to_invalid_params() {
        let err = GatewayError::not_permitted("INSERT", "read-only gateway");
        let mcp_err: rmcp::ErrorData = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_query_maps_to_invalid_params() {
        let err = GatewayError::query("Binder Error: no such column", "check columns");
        let mcp_err: rmcp::ErrorData = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_unknown_table_maps_to_resource_not_found() {
        let err = GatewayError::unknown_table("sales");
        let mcp_err: rmcp::ErrorData = err.into();
        // resource_not_found uses -32002 in rmcp
        assert_eq!(mcp_err.code.0, -32002);
    }

    #[test]
    fn test_io_maps_to_internal_error() {
        let err = GatewayError::io("disk full", "free space");
        let mcp_err: rmcp::ErrorData = err.into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
    }

    #[test]
    fn test_connection_maps_to_internal_error() {
        let err = GatewayError::connection("invalid motherduck token", "check MOTHERDUCK_TOKEN");
        let mcp_err: rmcp::ErrorData = err.into();
        assert_eq!(mcp_err.code.0, -32603);
    }

    #[test]
    fn test_suggestion_included_in_data() {
        let err = GatewayError::query("syntax error", "check syntax");
        let mcp_err: rmcp::ErrorData = err.into();
        let data = mcp_err.data.unwrap();
        assert_eq!(data["suggestion"], "check syntax");
    }
}
