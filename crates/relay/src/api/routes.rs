//! Route handlers: kiosk sockets, the publisher socket and membership listing.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};

use shared::{Alert, KioskInfo};

use crate::api::AppState;
use crate::relay::{KioskRelay, KioskState};

/// How long a kiosk writer gets to flush its closing frame.
const WRITER_CLOSE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Query string accepted on the kiosk endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct KioskQuery {
    pub id: Option<String>,
}

pub async fn kiosks_list(State(state): State<AppState>) -> Json<Vec<KioskInfo>> {
    Json(state.relay.list())
}

// --- Kiosks ---

pub async fn kiosk_ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<KioskQuery>,
    State(state): State<AppState>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_kiosk_socket(socket, query.id, state.relay))
}

/// Join membership, run a writer task for broadcast frames and pings, and log
/// whatever the kiosk sends until the socket closes. The writer then sends
/// the closing frame itself before it exits.
async fn handle_kiosk_socket(socket: WebSocket, requested_id: Option<String>, relay: Arc<KioskRelay>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Arc<str>>();
    let conn = relay.join(requested_id.as_deref(), tx);

    let writer_conn = Arc::clone(&conn);
    let (close_tx, mut close_rx) = oneshot::channel::<()>();
    let mut ping_interval = tokio::time::interval(tokio::time::Duration::from_secs(30));
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                frame = rx.recv() => {
                    let Some(frame) = frame else { break };
                    if let Err(e) = ws_tx.send(Message::Text(frame.to_string().into())).await {
                        tracing::warn!(kiosk = %writer_conn.display_id(), error = %e, "failed to send alert to kiosk");
                        writer_conn.set_state(KioskState::Closing);
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                        writer_conn.set_state(KioskState::Closing);
                        break;
                    }
                }
                _ = &mut close_rx => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    let _ = ws_tx.close().await;
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(t)) => {
                tracing::info!(kiosk = %conn.display_id(), "kiosk says: {}", t.as_str());
            }
            Ok(Message::Binary(b)) => {
                tracing::debug!(kiosk = %conn.display_id(), len = b.len(), "kiosk sent binary frame");
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(kiosk = %conn.display_id(), error = %e, "kiosk socket error");
                break;
            }
        }
    }

    conn.set_state(KioskState::Closing);
    relay.leave(conn.id());
    let _ = close_tx.send(());
    if tokio::time::timeout(WRITER_CLOSE_TIMEOUT, &mut writer).await.is_err() {
        tracing::warn!(kiosk = %conn.display_id(), "kiosk writer did not finish closing");
        writer.abort();
    }
}

// --- Publisher ---

pub async fn publish_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_publisher_socket(socket, state.relay))
}

/// Every text frame from the alert service is one alert to fan out.
async fn handle_publisher_socket(mut socket: WebSocket, relay: Arc<KioskRelay>) {
    tracing::info!("alert publisher connected");
    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(t)) => match serde_json::from_str::<Alert>(t.as_str()) {
                Ok(alert) => {
                    relay.broadcast(&alert);
                }
                Err(e) => tracing::warn!(error = %e, "ignoring malformed alert frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "alert publisher socket error");
                break;
            }
        }
    }
    tracing::info!("alert publisher disconnected");
}
