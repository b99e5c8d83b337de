//! Alert service: HTTP API plus the managed link to the kiosk relay.
//!
//! Optional env: HOST, PORT, DATABASE_PATH, KIOSK_RELAY_URL, KIOSK_RECONNECT_DELAY_MS

use std::net::SocketAddr;
use std::sync::Arc;

use alert_service::{api, config, db, notifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::Config::from_env();

    let db = db::Db::open(&config.database_path)?;
    db.run_migrations()?;
    let db = Arc::new(db);

    // The service keeps accepting alerts whether or not the relay is reachable.
    let link = Arc::new(notifier::ConnectionManager::initialize(
        config.kiosk_relay_url.clone(),
        config.reconnect_delay,
    ));
    let dispatcher = Arc::new(notifier::AlertDispatcher::new(link));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {}", e))?;

    let state = api::AppState { db, dispatcher };
    let app = api::router(state);

    tracing::info!("Alert service listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
