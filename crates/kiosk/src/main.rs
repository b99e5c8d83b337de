//! Kiosk display simulator: connects to the relay and prints alerts.

use std::time::Duration;

use clap::Parser;
use kiosk_sim::{cli, client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    client::run_kiosk(
        &cli.url,
        &cli.kiosk_id,
        Duration::from_secs(cli.reconnect_secs),
    )
    .await
}
