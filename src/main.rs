//! Data Analyst MCP Gateway - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to import CSV data, run read-only SQL, and export results, backed by a
//! single analytical database connection.

use clap::Parser;
use data_analyst_mcp::config::{Config, TransportMode};
use data_analyst_mcp::db::Database;
use data_analyst_mcp::mcp::AnalystService;
use data_analyst_mcp::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// All output goes to stderr. On the stdio transport, stdout carries the
/// MCP protocol stream and must stay clean.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    let backend = config.backend();
    info!(
        transport = %config.transport,
        backend = %backend,
        "Starting Data Analyst MCP Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );

    // The data directory bounds local imports and receives exports
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        warn!(
            data_dir = %config.data_dir.display(),
            error = %e,
            "Could not create data directory; local imports and exports will fail"
        );
    }

    let db = Arc::new(Database::connect(&backend)?);

    let service = AnalystService::new(
        db,
        config.data_dir.clone(),
        config.preview_limit,
        config.on_conflict,
    );

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(service);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                service,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
