//! Configuration handling for the Data Analyst MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Policy applied when import_csv targets an existing table name.
///
/// The underlying database supports both; which one the gateway uses is
/// deliberately configuration-selectable rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImportConflictPolicy {
    /// Replace the existing table (CREATE OR REPLACE TABLE)
    #[default]
    Replace,
    /// Fail with an error if the table already exists
    Error,
}

impl std::fmt::Display for ImportConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Database backend selected from the environment.
///
/// Presence of a MotherDuck token switches the gateway from a local
/// in-memory database to the cloud-backed one; nothing else changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    /// Local in-memory DuckDB database
    InMemory,
    /// MotherDuck cloud-backed database (token is sensitive - not logged)
    MotherDuck { token: String },
}

impl BackendMode {
    /// Build the DuckDB connection string for this backend.
    pub fn connection_string(&self) -> String {
        match self {
            Self::InMemory => ":memory:".to_string(),
            Self::MotherDuck { token } => format!("md:?motherduck_token={token}"),
        }
    }
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => write!(f, "in-memory"),
            Self::MotherDuck { .. } => write!(f, "motherduck"),
        }
    }
}

/// Configuration for the Data Analyst MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "data-analyst-mcp",
    about = "MCP server for CSV import and SQL analysis - enables AI assistants to explore tabular data",
    version,
    author
)]
pub struct Config {
    /// MotherDuck token. When set, the gateway connects to MotherDuck
    /// instead of a local in-memory database.
    #[arg(long, value_name = "TOKEN", env = "MOTHERDUCK_TOKEN", hide_env_values = true)]
    pub motherduck_token: Option<String>,

    /// Directory for user-supplied input files and export outputs.
    /// Created at startup if missing.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR, env = "MCP_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Default number of preview rows returned by query_data
    #[arg(
        long,
        default_value_t = crate::models::DEFAULT_PREVIEW_ROWS,
        env = "MCP_PREVIEW_LIMIT"
    )]
    pub preview_limit: u32,

    /// What import_csv does when the table name already exists
    #[arg(
        long = "on-conflict",
        value_enum,
        default_value = "replace",
        env = "MCP_IMPORT_ON_CONFLICT"
    )]
    pub on_conflict: ImportConflictPolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            motherduck_token: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            preview_limit: crate::models::DEFAULT_PREVIEW_ROWS,
            on_conflict: ImportConflictPolicy::Replace,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Select the database backend from the configured credential.
    ///
    /// A token that is present but blank counts as absent.
    pub fn backend(&self) -> BackendMode {
        match self.motherduck_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => BackendMode::MotherDuck {
                token: token.to_string(),
            },
            _ => BackendMode::InMemory,
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.on_conflict, ImportConflictPolicy::Replace);
        assert_eq!(config.backend(), BackendMode::InMemory);
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            ..Config::default()
        };
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_backend_selects_motherduck_when_token_present() {
        let config = Config {
            motherduck_token: Some("mdtok_abc".to_string()),
            ..Config::default()
        };
        let backend = config.backend();
        assert_eq!(
            backend,
            BackendMode::MotherDuck {
                token: "mdtok_abc".to_string()
            }
        );
        assert_eq!(
            backend.connection_string(),
            "md:?motherduck_token=mdtok_abc"
        );
    }

    #[test]
    fn test_backend_blank_token_is_in_memory() {
        let config = Config {
            motherduck_token: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.backend(), BackendMode::InMemory);
        assert_eq!(config.backend().connection_string(), ":memory:");
    }

    #[test]
    fn test_backend_display_redacts_token() {
        let backend = BackendMode::MotherDuck {
            token: "secret".to_string(),
        };
        assert!(!backend.to_string().contains("secret"));
    }

    #[test]
    fn test_conflict_policy_display() {
        assert_eq!(ImportConflictPolicy::Replace.to_string(), "replace");
        assert_eq!(ImportConflictPolicy::Error.to_string(), "error");
    }
}
