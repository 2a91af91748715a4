use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::state::AppState;
use crate::alert::extract_message;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/webhook", post(webhook))
        .route("/webhook/tradingview", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// POST /webhook/tradingview
async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let message = match extract_message(content_type, &body) {
        Ok(Some(message)) => message,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No message received"),
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
        }
    };
    debug!("Alert received ({:?}): {}", message.source, message.text);

    match state.pipeline.handle_alert(&message.text).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) if e.is_internal() => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        Err(e) => (
            StatusCode::OK,
            Json(json!({
                "status": "rejected",
                "stage": e.stage(),
                "error": e.to_string(),
                "received": message.text,
            })),
        )
            .into_response(),
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    Json(json!({
        "status": "healthy",
        "mode": state.mode,
        "timestamp": now,
        "uptime_seconds": (now - state.started_at).num_seconds(),
    }))
    .into_response()
}

/// GET /
async fn service_info(State(state): State<AppState>) -> Response {
    let formats: Vec<_> = state
        .pipeline
        .parser()
        .formats()
        .iter()
        .map(|format| {
            let descriptor = format.descriptor();
            json!({ "name": descriptor.name, "template": descriptor.template() })
        })
        .collect();

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.mode,
        "endpoints": {
            "webhook": "POST /webhook/tradingview",
            "webhook_alias": "POST /webhook",
            "health": "GET /health",
        },
        "formats": formats,
    }))
    .into_response()
}
