//! Generation payload assembly
//!
//! Builds the JSON body for the upstream POST. Wire field names come
//! from the variant configuration, so the same pipeline can speak the
//! different dialects the configured relay providers expect.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::VariantConfig;

/// Assemble the upstream request payload for one submission.
///
/// Model and every configured selector are always present. The prompt
/// field is set only when the trimmed prompt is non-empty, and the
/// images field only when at least one reference image survived
/// decoding. Selector values fall back to the configured default (or
/// first option) when the request does not pick one.
pub fn build_payload(
    variant: &VariantConfig,
    prompt: &str,
    image_uris: &[String],
    model: &str,
    selections: &HashMap<String, String>,
) -> Map<String, Value> {
    let mut payload = Map::new();

    payload.insert(variant.fields.model.clone(), Value::String(model.to_string()));

    for selector in &variant.selectors {
        let value = selections
            .get(&selector.field)
            .map(String::as_str)
            .or_else(|| selector.default_option());
        if let Some(value) = value {
            payload.insert(selector.field.clone(), Value::String(value.to_string()));
        }
    }

    if !prompt.is_empty() {
        payload.insert(
            variant.fields.prompt.clone(),
            Value::String(prompt.to_string()),
        );
    }

    if !image_uris.is_empty() {
        payload.insert(
            variant.fields.images.clone(),
            Value::Array(
                image_uris
                    .iter()
                    .map(|uri| Value::String(uri.clone()))
                    .collect(),
            ),
        );
    }

    payload
}
