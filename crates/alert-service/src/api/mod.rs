//! HTTP API routes.

mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::db::Db;
use crate::notifier::AlertDispatcher;

/// Shared app state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub dispatcher: Arc<AlertDispatcher>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(routes::alert_routes())
        .fallback(routes::not_found)
        .layer(cors)
        .with_state(state)
}

async fn root() -> &'static str {
    "Alert Service is running"
}

async fn health() -> &'static str {
    "ok"
}
