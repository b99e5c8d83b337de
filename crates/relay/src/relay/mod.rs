//! Kiosk membership and alert broadcast.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use uuid::Uuid;

use shared::{Alert, KioskInfo};

/// Transport state of a kiosk socket as seen by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KioskState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl KioskState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Open,
            1 => Self::Closing,
            _ => Self::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

/// One connected kiosk. Frames pushed here are written to the socket by the
/// connection's writer task.
#[derive(Debug)]
pub struct KioskConnection {
    id: Uuid,
    display_id: String,
    tx: mpsc::UnboundedSender<Arc<str>>,
    state: AtomicU8,
}

impl KioskConnection {
    pub fn new(display_id: impl Into<String>, tx: mpsc::UnboundedSender<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_id: display_id.into(),
            tx,
            state: AtomicU8::new(KioskState::Open as u8),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn display_id(&self) -> &str {
        &self.display_id
    }

    pub fn state(&self) -> KioskState {
        KioskState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set_state(&self, state: KioskState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Open and still attached to a writer.
    pub fn is_open(&self) -> bool {
        self.state() == KioskState::Open && !self.tx.is_closed()
    }

    fn send(&self, frame: Arc<str>) -> bool {
        self.tx.send(frame).is_ok()
    }
}

/// Relay state: the set of connected kiosks.
///
/// Joins and leaves happen from connection tasks; broadcasts read a snapshot.
#[derive(Default)]
pub struct KioskRelay {
    members: RwLock<HashMap<Uuid, Arc<KioskConnection>>>,
}

impl KioskRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly accepted kiosk.
    ///
    /// Without a requested id the kiosk is named `Kiosk-<n>`, n being the
    /// membership size plus one. Two kiosks can end up with the same name
    /// when others leave in between; names are for display only.
    pub fn join(
        &self,
        requested_id: Option<&str>,
        tx: mpsc::UnboundedSender<Arc<str>>,
    ) -> Arc<KioskConnection> {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let display_id = match requested_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("Kiosk-{}", members.len() + 1),
        };
        let conn = Arc::new(KioskConnection::new(display_id, tx));
        members.insert(conn.id(), Arc::clone(&conn));
        tracing::info!(kiosk = %conn.display_id(), members = members.len(), "kiosk connected");
        conn
    }

    /// Drop exactly this connection from membership.
    pub fn leave(&self, id: Uuid) -> Option<Arc<KioskConnection>> {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let removed = members.remove(&id);
        if let Some(conn) = &removed {
            conn.set_state(KioskState::Closed);
            tracing::info!(kiosk = %conn.display_id(), members = members.len(), "kiosk disconnected");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.members.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Arc<KioskConnection>> {
        self.members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// Membership listing, sorted by display id.
    pub fn list(&self) -> Vec<KioskInfo> {
        let mut kiosks: Vec<KioskInfo> = self
            .snapshot()
            .iter()
            .map(|c| KioskInfo {
                id: c.display_id().to_string(),
                state: c.state().as_str().to_string(),
            })
            .collect();
        kiosks.sort_by(|a, b| a.id.cmp(&b.id));
        kiosks
    }

    /// Serialize `alert` once and push it to every open kiosk.
    /// Kiosks that are not open are skipped and stay members.
    /// Returns the number of kiosks the frame was handed to.
    pub fn broadcast(&self, alert: &Alert) -> usize {
        let frame: Arc<str> = match alert.to_frame() {
            Ok(f) => f.into(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize alert");
                return 0;
            }
        };
        let members = self.snapshot();
        let mut delivered = 0;
        for conn in &members {
            if !conn.is_open() {
                continue;
            }
            if conn.send(Arc::clone(&frame)) {
                delivered += 1;
            } else {
                tracing::warn!(kiosk = %conn.display_id(), "failed to queue alert for kiosk");
            }
        }
        tracing::info!(
            delivered,
            members = members.len(),
            alert = %alert.alert,
            "broadcasted alert to all kiosks"
        );
        delivered
    }
}
