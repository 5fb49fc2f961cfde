//! Currency Converter Server
//!
//! Serves GET /convert, converting an amount into every currency the
//! configured exchange-rate provider supports

use anyhow::{Context, Result};
use currency_converter::{create_router, utils::logging::init_logging, version_info, Settings};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load settings from environment (and .env if present)
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging)?;
    info!("{}", version_info());
    info!("Rate provider: {}", settings.rates.base_url);

    let addr = settings.listen_addr();
    let app = create_router(settings).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Currency converter started on http://{}", addr);
    info!("Conversion endpoint: http://{}/convert?amount=<int>&currency=<code>", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
