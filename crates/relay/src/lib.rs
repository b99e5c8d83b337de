//! Kiosk relay: accepts kiosk display sockets and fans alerts out to them.

pub mod api;
pub mod config;
pub mod relay;
