//! CLI argument parsing.

use clap::Parser;

use shared::endpoints;

#[derive(Parser, Debug)]
#[command(name = "kiosk-sim")]
#[command(about = "Kiosk display simulator that prints alerts broadcast by the kiosk relay")]
pub struct Cli {
    /// Display name reported to the relay
    #[arg(value_name = "KIOSK_ID", default_value = "Kiosk-1")]
    pub kiosk_id: String,

    /// Relay kiosk endpoint
    #[arg(value_name = "URL", default_value = endpoints::KIOSK_URL)]
    pub url: String,

    /// Seconds to wait before reconnecting after a disconnect
    #[arg(long, default_value_t = 3)]
    pub reconnect_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["kiosk-sim"]);
        assert_eq!(cli.kiosk_id, "Kiosk-1");
        assert_eq!(cli.url, "ws://localhost:5010/ws");
        assert_eq!(cli.reconnect_secs, 3);
    }

    #[test]
    fn positional_id_and_url() {
        let cli = Cli::parse_from([
            "kiosk-sim",
            "Lobby",
            "ws://relay:5010/ws",
            "--reconnect-secs",
            "10",
        ]);
        assert_eq!(cli.kiosk_id, "Lobby");
        assert_eq!(cli.url, "ws://relay:5010/ws");
        assert_eq!(cli.reconnect_secs, 10);
    }
}
