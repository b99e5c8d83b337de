//! WebSocket client loop for a simulated kiosk.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::display;

/// Relay URL with the kiosk's display id as the `id` query parameter,
/// form-encoded so any display name survives the trip.
pub fn kiosk_url(base: &str, kiosk_id: &str) -> Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("invalid relay url {:?}", base))?;
    url.query_pairs_mut().append_pair("id", kiosk_id);
    Ok(url.into())
}

/// Connect, print alerts, and reconnect after `reconnect_delay` forever.
pub async fn run_kiosk(url: &str, kiosk_id: &str, reconnect_delay: Duration) -> Result<()> {
    let url = kiosk_url(url, kiosk_id)?;
    loop {
        match connect_async(url.as_str()).await {
            Ok((ws, _)) => {
                tracing::info!(kiosk = kiosk_id, "connected to {}", url);
                if let Err(e) = handle_connection(ws, kiosk_id).await {
                    tracing::warn!(kiosk = kiosk_id, error = %e, "connection error");
                }
                tracing::info!(kiosk = kiosk_id, "disconnected");
            }
            Err(e) => {
                tracing::warn!(kiosk = kiosk_id, error = %e, "connect failed");
            }
        }
        tracing::info!(kiosk = kiosk_id, "retrying in {:?}", reconnect_delay);
        tokio::time::sleep(reconnect_delay).await;
    }
}

async fn handle_connection(
    mut ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    kiosk_id: &str,
) -> Result<()> {
    while let Some(msg) = ws.next().await {
        let text = match msg? {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };
        match display::parse_alert(&text) {
            Ok(alert) => println!("{}", display::render_alert(kiosk_id, &alert)),
            Err(e) => tracing::error!(kiosk = kiosk_id, error = %e, "error parsing alert"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kiosk_url_appends_id() {
        assert_eq!(
            kiosk_url("ws://localhost:5010/ws", "Kiosk-7").unwrap(),
            "ws://localhost:5010/ws?id=Kiosk-7"
        );
        assert_eq!(
            kiosk_url("ws://localhost:5010/ws?lang=en", "Lobby").unwrap(),
            "ws://localhost:5010/ws?lang=en&id=Lobby"
        );
    }

    #[test]
    fn kiosk_url_encodes_reserved_characters() {
        let base = "ws://localhost:5010/ws";
        assert_eq!(
            kiosk_url(base, "Front Desk").unwrap(),
            "ws://localhost:5010/ws?id=Front+Desk"
        );
        assert_eq!(
            kiosk_url(base, "A&B").unwrap(),
            "ws://localhost:5010/ws?id=A%26B"
        );
        assert_eq!(
            kiosk_url(base, "Hall#2").unwrap(),
            "ws://localhost:5010/ws?id=Hall%232"
        );
    }

    #[test]
    fn kiosk_url_rejects_bad_base() {
        assert!(kiosk_url("not a url", "Lobby").is_err());
    }
}
