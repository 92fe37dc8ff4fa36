//! HTTP routes for Easel
//!
//! This module defines all HTTP endpoints exposed by the server.

pub mod debug;
pub mod generate;
pub mod health;
pub mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI pages
        .route("/", get(pages::index))
        .route("/ui/:variant", get(pages::variant_page))
        // API
        .route("/api/variants", get(pages::list_variants))
        .route("/api/generate", post(generate::generate))
        // Health checks
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        // Development introspection (refuses unless debug_enabled)
        .route("/debug/config", get(debug::config_info))
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
