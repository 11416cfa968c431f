//! Proxy server for GitHub repository search
//!
//! This crate provides the `GET /search` proxy entry point. The proxy holds
//! the upstream credentials, validates caller parameters, and relays the
//! normalized upstream result.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod params;
mod rest_server;

use ghsearch_client::SearchClient;
use ghsearch_core::error::ResultExt;
use std::sync::Arc;
use tracing::info;

// Re-export error types from core
pub use ghsearch_core::error::{Error, Result};
pub use rest_server::{build_router, AppState, ErrorResponse, ProxySearchResponse};

/// Run the proxy server with the given configuration.
///
/// 1. Validates configuration
/// 2. Creates the upstream search client
/// 3. Serves HTTP on the configured address
/// 4. Shuts down on Ctrl+C
pub async fn run_server(config: ghsearch_core::config::Config) -> Result<()> {
    config.validate()?;

    let client = Arc::new(SearchClient::from_config(&config)?);
    let app = build_router(AppState::new(client));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {addr}"))?;

    println!("Starting search proxy on http://{addr}/search");
    info!("Search proxy listening on http://{addr}");

    let server_task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| Error::config(format!("Server error: {e}")))
    });

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        Err(e) => {
            tracing::error!("Error setting up signal handler: {e}");
        }
    }

    server_task.abort();
    let _ = server_task.await;

    info!("Search proxy shut down successfully");

    Ok(())
}
