//! Bridge between alert persistence and the kiosk relay link.

use std::sync::Arc;

use shared::Alert;

use super::connection::{ConnectionManager, SendStatus};

/// Hands stored alerts to the relay link. Delivery is best effort and never
/// reported back to the request that created the alert.
#[derive(Clone)]
pub struct AlertDispatcher {
    link: Arc<ConnectionManager>,
}

impl AlertDispatcher {
    pub fn new(link: Arc<ConnectionManager>) -> Self {
        Self { link }
    }

    pub fn link(&self) -> &ConnectionManager {
        &self.link
    }

    pub fn dispatch(&self, alert: &Alert) -> SendStatus {
        let frame = match alert.to_frame() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(alert_id = ?alert.id, error = %e, "failed to serialize alert");
                return SendStatus::Dropped;
            }
        };
        let status = self.link.send(frame);
        tracing::info!(alert_id = ?alert.id, status = ?status, "alert dispatched to kiosks");
        status
    }
}
