//! Kiosk relay: WebSocket fan-out for kiosk alerts.
//!
//! Optional env: HOST, PORT, KIOSK_PATH, PUBLISH_PATH

use std::net::SocketAddr;
use std::sync::Arc;

use kiosk_relay::{api, config, relay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(config::Config::from_env());
    let relay = Arc::new(relay::KioskRelay::new());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {}", e))?;

    let state = api::AppState {
        relay,
        config: config.clone(),
    };
    let app = api::router(state);

    tracing::info!(
        "Kiosk relay listening on ws://{}{} (publisher: {})",
        addr,
        config.kiosk_path,
        config.publish_path
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
