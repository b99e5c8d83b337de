//! Managed WebSocket link from the alert service to the kiosk relay.
//!
//! One background task owns the socket. It connects, pumps outbound frames
//! while the link is open, and after every close waits a fixed delay before
//! trying again. There is no backoff and no retry limit.

use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

/// Link state as seen by callers of [`ConnectionManager::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// What happened to a payload handed to [`ConnectionManager::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Queued for the open socket.
    Accepted,
    /// Link not open; the payload is gone.
    Dropped,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect to {endpoint} failed: {source}")]
    Open {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),
    #[error("receive failed: {0}")]
    Receive(#[source] tungstenite::Error),
}

/// Handle to the managed link. Dropping the last handle lets the background
/// task flush frames already accepted, close the socket and exit.
pub struct ConnectionManager {
    endpoint: String,
    state: watch::Receiver<ConnectionState>,
    outbound: mpsc::UnboundedSender<String>,
}

impl ConnectionManager {
    /// Start connecting to `endpoint` in the background. Must be called from
    /// within a tokio runtime; returns immediately.
    pub fn initialize(endpoint: impl Into<String>, reconnect_delay: Duration) -> Self {
        let endpoint = endpoint.into();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_link(
            endpoint.clone(),
            reconnect_delay,
            state_tx,
            outbound_rx,
        ));
        Self {
            endpoint,
            state: state_rx,
            outbound: outbound_tx,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Hand `payload` to the socket if the link is open, otherwise drop it.
    /// Never blocks and never retries.
    pub fn send(&self, payload: String) -> SendStatus {
        let state = self.state();
        if state != ConnectionState::Open {
            tracing::warn!(
                endpoint = %self.endpoint,
                state = ?state,
                payload = %payload,
                "kiosk relay not connected, cannot send alert"
            );
            return SendStatus::Dropped;
        }
        if self.outbound.send(payload).is_err() {
            tracing::warn!(endpoint = %self.endpoint, "kiosk relay link stopped, alert dropped");
            return SendStatus::Dropped;
        }
        SendStatus::Accepted
    }
}

/// How an open session ended.
enum LinkEnd {
    /// The relay went away; reconnect after the delay.
    Disconnected,
    /// Every handle is gone and the queue has been flushed.
    Shutdown,
}

async fn run_link(
    endpoint: String,
    reconnect_delay: Duration,
    state: watch::Sender<ConnectionState>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    loop {
        discard_pending(&mut outbound);
        state.send_replace(ConnectionState::Connecting);

        let Some(connected) = until_shutdown(connect_async(endpoint.as_str()), &mut outbound).await
        else {
            break;
        };
        match connected {
            Ok((ws, _)) => {
                tracing::info!(endpoint = %endpoint, "connected to kiosk relay");
                state.send_replace(ConnectionState::Open);
                match pump(ws, &mut outbound).await {
                    Ok(LinkEnd::Shutdown) => break,
                    Ok(LinkEnd::Disconnected) => {}
                    Err(e) => {
                        tracing::error!(endpoint = %endpoint, error = %e, "kiosk relay link error")
                    }
                }
            }
            Err(source) => {
                let e = TransportError::Open {
                    endpoint: endpoint.clone(),
                    source,
                };
                tracing::error!(error = %e, "kiosk relay connection failed");
            }
        }

        state.send_replace(ConnectionState::Closed);
        let dropped = discard_pending(&mut outbound);
        if dropped > 0 {
            tracing::warn!(dropped, "alerts in flight lost on disconnect");
        }
        tracing::info!(
            endpoint = %endpoint,
            "kiosk relay disconnected, retrying in {:?}",
            reconnect_delay
        );
        if until_shutdown(tokio::time::sleep(reconnect_delay), &mut outbound)
            .await
            .is_none()
        {
            break;
        }
    }

    state.send_replace(ConnectionState::Closed);
    tracing::info!(endpoint = %endpoint, "kiosk relay link shut down");
}

/// Run `fut` to completion unless every handle is dropped first, in which
/// case `None` is returned. Payloads arriving meanwhile were accepted against
/// a stale state and are discarded.
async fn until_shutdown<F: Future>(
    fut: F,
    outbound: &mut mpsc::UnboundedReceiver<String>,
) -> Option<F::Output> {
    tokio::pin!(fut);
    loop {
        tokio::select! {
            out = &mut fut => return Some(out),
            payload = outbound.recv() => match payload {
                Some(_) => tracing::warn!("alert arrived while kiosk relay link down, dropped"),
                None => return None,
            },
        }
    }
}

/// Write outbound frames until the relay closes the socket, a transport
/// error occurs, or every handle is dropped. In the last case the queue is
/// drained before the close frame goes out. Inbound frames are ignored.
async fn pump(
    ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    outbound: &mut mpsc::UnboundedReceiver<String>,
) -> Result<LinkEnd, TransportError> {
    let (mut ws_tx, mut ws_rx) = ws.split();
    loop {
        tokio::select! {
            payload = outbound.recv() => {
                let Some(payload) = payload else {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return Ok(LinkEnd::Shutdown);
                };
                ws_tx
                    .send(Message::Text(payload))
                    .await
                    .map_err(TransportError::Send)?;
                tracing::debug!("alert sent to kiosk relay");
            }
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => return Ok(LinkEnd::Disconnected),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(TransportError::Receive(e)),
            },
        }
    }
}

/// Empty the outbound queue; returns how many payloads were thrown away.
fn discard_pending(outbound: &mut mpsc::UnboundedReceiver<String>) -> usize {
    let mut dropped = 0;
    while outbound.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}
