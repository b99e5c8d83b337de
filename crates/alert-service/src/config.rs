//! Configuration for the alert service.

use std::path::PathBuf;
use std::time::Duration;

use shared::endpoints;

/// Alert service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Relay publisher endpoint the managed link connects to.
    pub kiosk_relay_url: String,
    pub reconnect_delay: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; unset or unparsable values fall back
    /// to the defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3001);
        let database_path = var("DATABASE_PATH")
            .or_else(|| var("DATABASE_URL"))
            .map(|s| PathBuf::from(s.trim_start_matches("sqlite:")))
            .unwrap_or_else(|| PathBuf::from("./data/alerts.db"));
        let kiosk_relay_url =
            var("KIOSK_RELAY_URL").unwrap_or_else(|| endpoints::PUBLISH_URL.to_string());
        let reconnect_delay_ms = var("KIOSK_RECONNECT_DELAY_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(endpoints::RECONNECT_DELAY_MS);

        Self {
            host,
            port,
            database_path,
            kiosk_relay_url,
            reconnect_delay: Duration::from_millis(reconnect_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.database_path, PathBuf::from("./data/alerts.db"));
        assert_eq!(cfg.kiosk_relay_url, endpoints::PUBLISH_URL);
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(3000));
    }

    #[test]
    fn relay_url_and_delay_overrides() {
        let cfg = config(&[
            ("KIOSK_RELAY_URL", "ws://relay.internal:9000/ws/publish"),
            ("KIOSK_RECONNECT_DELAY_MS", "250"),
        ]);
        assert_eq!(cfg.kiosk_relay_url, "ws://relay.internal:9000/ws/publish");
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = config(&[("KIOSK_RECONNECT_DELAY_MS", "soon"), ("PORT", "http")]);
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(3000));
        assert_eq!(cfg.port, 3001);
    }

    #[test]
    fn database_url_strips_sqlite_scheme() {
        let cfg = config(&[("DATABASE_URL", "sqlite:/var/lib/alerts.db")]);
        assert_eq!(cfg.database_path, PathBuf::from("/var/lib/alerts.db"));

        let cfg = config(&[
            ("DATABASE_PATH", "/srv/a.db"),
            ("DATABASE_URL", "sqlite:/srv/b.db"),
        ]);
        assert_eq!(cfg.database_path, PathBuf::from("/srv/a.db"));
    }
}
