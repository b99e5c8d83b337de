//! Alert service: stores alerts and notifies kiosk displays through the relay.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod notifier;
