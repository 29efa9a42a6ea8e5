//! Data Analyst MCP Gateway Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to import, query, and export tabular data through an analytical database
//! (local in-memory DuckDB or MotherDuck cloud).

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::GatewayError;
pub use mcp::AnalystService;
