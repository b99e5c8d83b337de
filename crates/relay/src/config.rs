//! Configuration for the kiosk relay.

use shared::endpoints;

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub kiosk_path: String,
    pub publish_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(endpoints::RELAY_PORT);
        let kiosk_path = std::env::var("KIOSK_PATH")
            .map(normalize_path)
            .unwrap_or_else(|_| endpoints::KIOSK_PATH.to_string());
        let publish_path = std::env::var("PUBLISH_PATH")
            .map(normalize_path)
            .unwrap_or_else(|_| endpoints::PUBLISH_PATH.to_string());

        Self {
            host,
            port,
            kiosk_path,
            publish_path,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: endpoints::RELAY_PORT,
            kiosk_path: endpoints::KIOSK_PATH.to_string(),
            publish_path: endpoints::PUBLISH_PATH.to_string(),
        }
    }
}

/// Routes must start with a slash.
fn normalize_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
