//! UI pages
//!
//! Serves the variant index and the single-page UI for each configured
//! variant. All variants share one embedded template; the page is
//! specialized client-side from a JSON bootstrap of the variant config,
//! which is also exposed as `/api/variants`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

use crate::{
    config::VariantConfig,
    error::{AppError, AppResult},
    AppState,
};

const INDEX_TEMPLATE: &str = include_str!("../assets/index.html");
const VARIANT_TEMPLATE: &str = include_str!("../assets/variant.html");

/// GET / - variant index
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let links: String = state
        .config
        .variants
        .iter()
        .map(|variant| {
            format!(
                "<li><a href=\"/ui/{}\">{}</a></li>",
                escape_html(&variant.name),
                escape_html(&variant.title)
            )
        })
        .collect();

    Html(INDEX_TEMPLATE.replace("__LINKS__", &links))
}

/// GET /ui/{variant} - single-page UI for one variant
pub async fn variant_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Html<String>> {
    let variant = state
        .config
        .variant(&name)
        .ok_or_else(|| AppError::NotFound(format!("No such variant: {}", name)))?;

    let bootstrap = serde_json::to_string(variant)?;
    let page = VARIANT_TEMPLATE
        .replace("__TITLE__", &escape_html(&variant.title))
        // Keep the inline <script> intact whatever the config contains
        .replace("__BOOTSTRAP__", &bootstrap.replace("</", "<\\/"));

    Ok(Html(page))
}

/// GET /api/variants - variant metadata consumed by the pages
pub async fn list_variants(State(state): State<Arc<AppState>>) -> Json<Vec<VariantConfig>> {
    Json(state.config.variants.clone())
}

/// Minimal HTML escaping for config-sourced strings.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
