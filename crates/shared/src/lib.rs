//! Shared types for the kiosk relay, alert service and kiosk simulator.

mod models;

pub use models::endpoints;
pub use models::{
    Alert, CreateAlertRequest, CreateAlertResponse, ErrorResponse, KioskInfo, MessageResponse,
};
