//! Debug endpoints for development
//!
//! These endpoints are only served when `debug_enabled` is set in the
//! config. They provide introspection into the loaded configuration.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    config::VariantConfig,
    error::{AppError, AppResult},
    AppState,
};

/// Config response (non-sensitive)
#[derive(Debug, Serialize)]
pub struct ConfigInfo {
    pub endpoint: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub variants: Vec<VariantConfig>,
    pub debug_enabled: bool,
}

/// Mask a credential down to a recognizable stub.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}***", visible)
}

/// GET /debug/config - redacted view of the loaded configuration
pub async fn config_info(State(state): State<Arc<AppState>>) -> AppResult<Json<ConfigInfo>> {
    if !state.config.debug_enabled {
        return Err(AppError::NotFound("Debug endpoints are disabled".to_string()));
    }

    Ok(Json(ConfigInfo {
        endpoint: state.config.api.endpoint.clone(),
        api_key: mask_key(&state.config.api.key),
        request_timeout_secs: state.config.api.request_timeout_secs,
        fetch_timeout_secs: state.config.api.fetch_timeout_secs,
        variants: state.config.variants.clone(),
        debug_enabled: state.config.debug_enabled,
    }))
}
