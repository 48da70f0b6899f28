//! Daemon entry point for the BGS borehole MCP server.
//!
//! Loads configuration from the environment, builds the upstream OGC API
//! client and control plane, and serves the MCP protocol over stdio or
//! streamable HTTP.

mod config;

use std::sync::Arc;

use bgs_core::control::{BoreholeControlPlane, QueryLimits};
use bgs_core::fetch::{OgcApiClient, OgcApiConfig};
use bgs_mcp::server::McpHttpServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::BgsConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = BgsConfig::from_args()?;
    init_tracing();

    let client_config = OgcApiConfig::new(config.api_base_url.clone())
        .with_collection(config.collection.clone())
        .with_timeout(config.http_timeout);
    let client = OgcApiClient::new(client_config)?;

    let limits = QueryLimits::default()
        .with_default_limit(config.result_limit)
        .with_max_limit(config.max_result_limit)
        .with_fetch_limit(config.fetch_limit)
        .with_bucket_width_m(config.bucket_width_m);
    let control = Arc::new(BoreholeControlPlane::with_limits(client, limits));

    if config.enable_stdio {
        info!("serving MCP over stdio");
        bgs_mcp::server::serve_stdio(control).await?;
    } else {
        let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
        bgs_mcp::server::serve_streamable_http(control, http_config).await?;
    }
    Ok(())
}

/// Logs go to stderr so stdout stays a clean MCP channel in stdio mode.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
