use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level relay error. Every variant renders to the same opaque 500
/// response; the detail is only ever logged.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Client input ─────────────────────────────────────────────────────────
    #[error("Invalid chat request: {message}")]
    InvalidRequest { message: String },

    // ── Configuration ────────────────────────────────────────────────────────
    #[error("Upstream credential is not configured")]
    MissingCredential,

    // ── Upstream provider ────────────────────────────────────────────────────
    #[error("Upstream provider unreachable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("Upstream provider rejected the request with status {status}")]
    UpstreamRejected { status: u16 },

    #[error("Failed reading upstream stream: {0}")]
    StreamRead(#[source] BoxError),
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest { message: message.into() }
    }

    pub fn is_client_input(&self) -> bool {
        matches!(self, AppError::InvalidRequest { .. })
    }

    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamUnavailable(_) | AppError::UpstreamRejected { .. } | AppError::StreamRead(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_client_input() {
            tracing::warn!("Rejecting chat request: {self}");
        } else if self.is_upstream() {
            tracing::error!(upstream = true, "Error in chat API: {self}");
        } else {
            tracing::error!("Error in chat API: {self}");
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Internal server error" })),
        )
            .into_response()
    }
}
