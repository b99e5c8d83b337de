//! Alert route handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};

use shared::{Alert, CreateAlertRequest, CreateAlertResponse, ErrorResponse, MessageResponse};

use crate::api::AppState;
use crate::auth;
use crate::db;

type ErrorReply = (StatusCode, Json<ErrorResponse>);
type MessageReply = (StatusCode, Json<MessageResponse>);

pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(alerts_list).post(alerts_create))
        .route("/alerts/{id}", get(alerts_get))
}

fn bad_request(error: &str) -> ErrorReply {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error)))
}

fn db_error(e: anyhow::Error) -> MessageReply {
    tracing::error!(error = %e, "alert query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse {
            message: "Database error".to_string(),
            error: Some(e.to_string()),
        }),
    )
}

/// `sent_at` as given (any RFC 3339 offset), normalized to UTC seconds.
fn normalize_sent_at(raw: Option<&str>) -> Result<String, ErrorReply> {
    let at = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|_| bad_request("Invalid sent_at timestamp"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    Ok(at.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Store the alert, then hand it to the kiosk link. The response depends only
/// on the insert; kiosk delivery is never reflected here.
async fn alerts_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<CreateAlertResponse>), ErrorReply> {
    let message = req
        .alert
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| bad_request("Alert message is required"))?;

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| bad_request("Authorization header missing"))?;
    let token = header
        .to_str()
        .ok()
        .and_then(auth::token_from_header)
        .ok_or_else(|| bad_request("Token missing"))?;
    let sent_by = auth::sender_from_token(token);
    let sent_at = normalize_sent_at(req.sent_at.as_deref())?;

    let saved = {
        let conn = state.db.conn();
        db::create_alert(&conn, message, &sent_by, &sent_at).map_err(|e| {
            tracing::error!(error = %e, "error inserting alert");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error while inserting alert")),
            )
        })?
    };

    state.dispatcher.dispatch(&saved);

    Ok((
        StatusCode::CREATED,
        Json(CreateAlertResponse {
            message: "Alert created successfully".to_string(),
            data: saved,
        }),
    ))
}

async fn alerts_list(State(state): State<AppState>) -> Result<Json<Vec<Alert>>, MessageReply> {
    let conn = state.db.conn();
    let alerts = db::list_alerts(&conn).map_err(db_error)?;
    if alerts.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("Alert not found")),
        ));
    }
    Ok(Json(alerts))
}

/// An id that is not an integer can match no row, so it is a 404 like any
/// other missing alert.
async fn alerts_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Alert>, MessageReply> {
    let missing = || {
        (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("Alerts not found")),
        )
    };
    let id: i64 = id.parse().map_err(|_| missing())?;
    let conn = state.db.conn();
    db::get_alert(&conn, id)
        .map_err(db_error)?
        .map(Json)
        .ok_or_else(missing)
}

pub async fn not_found(uri: Uri) -> MessageReply {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new(format!("Route {} not found", uri))),
    )
}
