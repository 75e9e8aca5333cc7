use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{ChatTurn, UpstreamRequest};

/// Thin client for the upstream chat-completions provider. One outbound POST
/// per relay; no retries.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl UpstreamClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Opens a streaming completion for `messages`. Returns the live response
    /// only when the provider answered with a success status; the body has
    /// not been read yet.
    pub async fn open_stream(&self, messages: &[ChatTurn]) -> Result<reqwest::Response, AppError> {
        let api_key = self.config.api_key.as_deref().ok_or(AppError::MissingCredential)?;

        let body = UpstreamRequest {
            model: &self.config.model,
            messages,
            stream: true,
        };

        info!(model = %self.config.model, turns = messages.len(), "Opening upstream stream");

        let response = self
            .http
            .post(self.config.completions_url())
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Upstream request failed: {e}");
                AppError::UpstreamUnavailable(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // The provider's error body is never read or forwarded.
            return Err(AppError::UpstreamRejected { status: status.as_u16() });
        }

        Ok(response)
    }
}
