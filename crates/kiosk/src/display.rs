//! Rendering of received alert frames.

use shared::Alert;

/// Parse one text frame from the relay.
pub fn parse_alert(frame: &str) -> serde_json::Result<Alert> {
    serde_json::from_str(frame)
}

/// Banner printed when an alert arrives.
pub fn render_alert(kiosk_id: &str, alert: &Alert) -> String {
    let rule = "=".repeat(30);
    let mut out = format!("\n{rule}\n[{kiosk_id}]\nNew Alert Received!\nMessage: {}\n", alert.alert);
    if let Some(sent_by) = &alert.sent_by {
        out.push_str(&format!("From: {sent_by}\n"));
    }
    out.push_str(&format!("Time: {}\n{rule}\n", alert.sent_at));
    out
}
