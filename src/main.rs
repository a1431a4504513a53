//! casdm - MCP server for CA Service Desk Manager incidents
//!
//! This binary runs as an MCP server using stdio transport, so an MCP client
//! can open, inspect, update and close incidents through natural language.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `CASDM_BASE_URL`: Base URL of the CASDM REST service
//! - `CASDM_USERNAME` / `CASDM_PASSWORD`: Credentials for `/rest_access`
//! - `CASDM_TIMEOUT_SECS` (optional): Request timeout in seconds
//!
//! # Usage
//!
//! ```bash
//! CASDM_BASE_URL=https://sdm.example.com:8050/caisd-rest \
//! CASDM_USERNAME=servicedesk CASDM_PASSWORD=xxx ./casdm
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use casdm::{config, server, session::Session, transport::Transport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout is reserved for MCP JSON-RPC messages
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("casdm=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting casdm MCP server v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "Configuration loaded");

    let transport = Transport::new(config.timeout).context("Failed to create HTTP client")?;

    let session = Session::authenticate_with(transport, &config.base_url, &config.credentials())
        .await
        .map_err(|e| anyhow::anyhow!(e.sanitized_display(config.password_for_sanitization())))
        .context("Failed to authenticate with CA Service Desk Manager")?;

    let server = server::CasdmServer::new(session, config);

    tracing::info!("Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
