//! Helmdesk - multi-tenant helpdesk SLA and hour-bank service
//!
//! Main entry point for the HTTP server.

use helmdesk_api::{router, AppContext};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so we can see .env loading
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env file loaded"),
    }

    let config = helmdesk_infra::config::load()?;
    let ctx = AppContext::new(&config)?;

    let app = router(ctx);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!(addr = %config.server.bind_addr, "helmdesk listening");

    axum::serve(listener, app).await?;
    Ok(())
}
