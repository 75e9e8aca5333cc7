use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::errors::AppError;
use crate::models::ChatRequest;
use crate::service::relay_service::RelayService;

pub fn api_router(service: RelayService) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .with_state(service)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST `/api/chat` — relays the conversation upstream and streams the reply
/// back as plain text.
///
/// The body is parsed as JSON whatever its declared content type. Any error
/// up to the point the upstream stream is open yields the generic 500; after
/// that, the status line is already committed and failures only cut the body
/// short.
pub async fn chat_handler(State(svc): State<RelayService>, body: Bytes) -> Result<Response, AppError> {
    let request: ChatRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_request(e.to_string()))?;

    let fragments = svc.relay(request).await?;

    Ok((
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(fragments),
    )
        .into_response())
}

/// GET `/api/health`
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
