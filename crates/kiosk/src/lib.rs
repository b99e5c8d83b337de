//! Kiosk display simulator.

pub mod cli;
pub mod client;
pub mod display;
