//! Generation endpoint client
//!
//! HTTP client wrapper for the configured third-party image-generation
//! API. One POST per submission, bearer credential from configuration,
//! bounded timeout, no retry.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
};

/// Client for the upstream generation endpoint
pub struct GeneratorClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    request_timeout: Duration,
}

impl GeneratorClient {
    /// Create a new generator client sharing the application HTTP client
    pub fn new(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.key.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Send one generation request and return the raw response body.
    ///
    /// Connection errors, timeouts, and non-success statuses all map to
    /// `AppError`; the caller decides how to present them. The body is
    /// returned as text because the upstream may answer with plain JSON
    /// or an SSE-framed stream — normalization happens downstream.
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    pub async fn generate(&self, payload: &Map<String, Value>) -> AppResult<String> {
        debug!(fields = payload.len(), "Sending generation request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(payload)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Generation request failed to send");
                e
            })?;

        let status = response.status();
        debug!(status = %status, "Generation response status");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %truncate(&body, 512), "Generation request rejected");
            return Err(AppError::UpstreamError(format!(
                "API returned {}: {}",
                status,
                truncate(&body, 512)
            )));
        }

        let body = response.text().await?;
        debug!(body_len = body.len(), "Generation response received");
        Ok(body)
    }
}

/// Clip a body snippet for logs and error messages.
fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
