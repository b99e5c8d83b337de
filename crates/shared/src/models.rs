//! Shared request/response and domain models.

use serde::{Deserialize, Serialize};

/// A persisted alert, and the exact JSON shape pushed to kiosks.
///
/// Keys serialize in declaration order: `id`, `alert`, `sentBy`, `sentAt`.
/// The store's snake_case column names are accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default, alias = "alert_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub alert: String,
    #[serde(default, alias = "sent_by", skip_serializing_if = "Option::is_none")]
    pub sent_by: Option<String>,
    /// ISO-8601 UTC, `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(alias = "sent_at")]
    pub sent_at: String,
}

impl Alert {
    /// JSON text frame sent over the wire.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// --- HTTP DTOs ---

/// Create alert request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAlertRequest {
    pub alert: Option<String>,
    #[serde(default, alias = "sentAt")]
    pub sent_at: Option<String>,
}

/// Create alert response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlertResponse {
    pub message: String,
    pub data: Alert,
}

/// `{"error": "..."}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{"message": "...", "error"?: "..."}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }
}

/// One entry of the relay's `GET /kiosks` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskInfo {
    pub id: String,
    pub state: String,
}

/// Default endpoints shared by the binaries.
pub mod endpoints {
    pub const RELAY_PORT: u16 = 5010;
    pub const KIOSK_PATH: &str = "/ws";
    pub const PUBLISH_PATH: &str = "/ws/publish";
    pub const KIOSK_URL: &str = "ws://localhost:5010/ws";
    pub const PUBLISH_URL: &str = "ws://localhost:5010/ws/publish";
    /// Fixed delay between a close and the next connection attempt.
    pub const RECONNECT_DELAY_MS: u64 = 3000;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_drill() -> Alert {
        Alert {
            id: None,
            alert: "Fire drill".to_string(),
            sent_by: None,
            sent_at: "2025-01-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn frame_omits_absent_fields() {
        assert_eq!(
            fire_drill().to_frame().unwrap(),
            r#"{"alert":"Fire drill","sentAt":"2025-01-01T10:00:00Z"}"#
        );
    }

    #[test]
    fn frame_keeps_persisted_fields_in_order() {
        let alert = Alert {
            id: Some(12),
            sent_by: Some("ops@example.com".to_string()),
            ..fire_drill()
        };
        assert_eq!(
            alert.to_frame().unwrap(),
            r#"{"id":12,"alert":"Fire drill","sentBy":"ops@example.com","sentAt":"2025-01-01T10:00:00Z"}"#
        );
    }

    #[test]
    fn reads_store_column_names() {
        let alert: Alert = serde_json::from_str(
            r#"{"alert_id":1,"alert":"Test alert message 1","sent_by":"test@example.com","sent_at":"2025-01-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(alert.id, Some(1));
        assert_eq!(alert.sent_by.as_deref(), Some("test@example.com"));
        assert_eq!(alert.sent_at, "2025-01-01T10:00:00Z");
    }

    #[test]
    fn rejects_frame_without_message() {
        assert!(serde_json::from_str::<Alert>(r#"{"sentAt":"2025-01-01T10:00:00Z"}"#).is_err());
    }

    #[test]
    fn create_request_accepts_both_timestamp_keys() {
        let a: CreateAlertRequest =
            serde_json::from_str(r#"{"alert":"x","sent_at":"2025-01-01T10:00:00Z"}"#).unwrap();
        let b: CreateAlertRequest =
            serde_json::from_str(r#"{"alert":"x","sentAt":"2025-01-01T10:00:00Z"}"#).unwrap();
        assert_eq!(a.sent_at, b.sent_at);
        let empty: CreateAlertRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.alert.is_none());
    }
}
