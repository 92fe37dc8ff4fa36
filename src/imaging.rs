//! Image decoding and encoding helpers
//!
//! Reference images arrive from the browser as data URIs or raw base64
//! strings, and everything sent back out (to the upstream API and to the
//! browser) is a PNG data URI. All pixel data is normalized to RGB8.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::AppResult;

/// Decode a base64-encoded image, with or without a `data:` URI header.
///
/// The header, when present, is discarded up to the first comma. Returns
/// `None` on malformed base64 or unrecognized image bytes — callers on
/// this path treat a bad payload as "no image", never as an error.
pub fn decode_base64_image(data: &str) -> Option<DynamicImage> {
    let payload = if data.starts_with("data:") {
        data.split_once(',')?.1
    } else {
        data
    };
    let binary = BASE64.decode(payload.trim()).ok()?;
    let image = image::load_from_memory(&binary).ok()?;
    Some(DynamicImage::ImageRgb8(image.into_rgb8()))
}

/// Decode uploaded reference images, best effort.
///
/// Inputs that fail to decode are dropped without comment; a corrupt
/// upload simply does not appear in the batch.
pub fn load_references(inputs: &[String]) -> Vec<DynamicImage> {
    let loaded: Vec<DynamicImage> = inputs
        .iter()
        .filter_map(|input| decode_base64_image(input))
        .collect();
    if loaded.len() < inputs.len() {
        debug!(
            supplied = inputs.len(),
            decoded = loaded.len(),
            "Some reference images failed to decode and were skipped"
        );
    }
    loaded
}

/// PNG-encode an image and wrap it as a `data:image/png;base64,...` URI.
pub fn to_png_data_uri(image: &DynamicImage) -> AppResult<String> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        BASE64.encode(buffer.get_ref())
    ))
}
