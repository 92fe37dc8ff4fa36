//! Generation endpoint
//!
//! Accepts one submission from a variant page, forwards it to the
//! upstream API, and returns the extracted image plus the response
//! text for the debug pane.
//!
//! Recoverable failures (missing input, upstream transport errors,
//! unparseable responses) are part of the normal result shape — the
//! browser always gets HTTP 200 with something it can display.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    client::build_payload,
    error::AppError,
    extract::{find_image_payload, materialize_image, parse_response_payload},
    imaging,
    AppState,
};

/// One generation submission from a variant page
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Variant name; the first configured variant when omitted
    pub variant: Option<String>,
    #[serde(default)]
    pub prompt: String,
    /// Reference images as data URIs or raw base64
    #[serde(default)]
    pub images: Vec<String>,
    /// Model name; the variant default when omitted
    pub model: Option<String>,
    /// Selector wire-field name -> chosen value
    #[serde(default)]
    pub selections: HashMap<String, String>,
}

/// The displayable result of a submission
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Generated image as a PNG data URI, when one was extracted
    pub image: Option<String>,
    /// Pretty-printed response JSON, raw body, or an error message
    pub response: String,
}

impl GenerateResponse {
    fn message(text: impl Into<String>) -> Self {
        Self {
            image: None,
            response: text.into(),
        }
    }
}

/// Handle a generation submission
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("generate", %request_id);

    async move {
        let start_time = Instant::now();

        let variant = match &request.variant {
            Some(name) => match state.config.variant(name) {
                Some(variant) => variant,
                None => {
                    warn!(variant = %name, "Submission for unknown variant");
                    return Ok(Json(GenerateResponse::message(format!(
                        "Error: unknown variant '{}'.",
                        name
                    ))));
                }
            },
            // Config validation guarantees at least one variant
            None => &state.config.variants[0],
        };

        let prompt = request.prompt.trim();
        let references = imaging::load_references(&request.images);

        if prompt.is_empty() && references.is_empty() {
            info!(variant = %variant.name, "Rejected submission with no prompt and no usable images");
            return Ok(Json(GenerateResponse::message(
                "Error: provide a prompt or at least one reference image.",
            )));
        }

        let mut reference_uris = Vec::with_capacity(references.len());
        for image in &references {
            reference_uris.push(imaging::to_png_data_uri(image)?);
        }

        let model = request
            .model
            .as_deref()
            .unwrap_or_else(|| variant.default_model());

        let payload = build_payload(variant, prompt, &reference_uris, model, &request.selections);

        info!(
            variant = %variant.name,
            model = %model,
            prompt_len = prompt.len(),
            references = references.len(),
            "Forwarding generation request"
        );

        let body = match state.generator.generate(&payload).await {
            Ok(body) => body,
            Err(error) => {
                return Ok(Json(GenerateResponse::message(format!(
                    "Error: upstream request failed: {}",
                    error
                ))));
            }
        };

        let Some(data) = parse_response_payload(&body) else {
            warn!(body_len = body.len(), "Response was neither JSON nor an event stream");
            // Show the raw body so the user can see what came back
            return Ok(Json(GenerateResponse {
                image: None,
                response: body,
            }));
        };

        let fetch_timeout = Duration::from_secs(state.config.api.fetch_timeout_secs);
        let image = match find_image_payload(&data) {
            Some(reference) => {
                materialize_image(&state.http_client, reference, fetch_timeout).await?
            }
            None => {
                info!("No image reference found in response");
                None
            }
        };

        let image_uri = match &image {
            Some(image) => Some(imaging::to_png_data_uri(image)?),
            None => None,
        };

        info!(
            variant = %variant.name,
            model = %model,
            image_extracted = image.is_some(),
            duration_ms = %format!("{:.2}", start_time.elapsed().as_secs_f64() * 1000.0),
            "Generation request completed"
        );

        Ok(Json(GenerateResponse {
            image: image_uri,
            response: serde_json::to_string_pretty(&data)?,
        }))
    }
    .instrument(span)
    .await
}
