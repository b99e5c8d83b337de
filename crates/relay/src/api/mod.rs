//! HTTP and WebSocket routes.

mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::relay::KioskRelay;

/// Shared app state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<KioskRelay>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/kiosks", get(routes::kiosks_list))
        .route(&state.config.kiosk_path, get(routes::kiosk_ws_handler))
        .route(&state.config.publish_path, get(routes::publish_ws_handler))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
