//! Image reference materialization
//!
//! Resolves a located reference string into decoded pixels: HTTP(S)
//! references are fetched with a bounded timeout, anything else is
//! treated as base64 (with an optional `data:` header).

use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::imaging::decode_base64_image;

/// Resolve an image reference into a decoded image.
///
/// For URL references any transport failure or non-success status maps
/// to `Ok(None)` — there is no retry and nothing to surface beyond the
/// debug text the caller already has. Decode failures on fetched bytes
/// do propagate: a 200 response that is not an image is an upstream
/// contract violation, not an absent image. The base64 arm swallows all
/// of its failures and yields `None` instead.
pub async fn materialize_image(
    client: &reqwest::Client,
    reference: &str,
    fetch_timeout: Duration,
) -> AppResult<Option<DynamicImage>> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        let response = match client.get(reference).timeout(fetch_timeout).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %reference, error = %error, "Image fetch failed");
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %reference, status = %status, "Image host returned an error status");
            return Ok(None);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(url = %reference, error = %error, "Image download was interrupted");
                return Ok(None);
            }
        };

        debug!(url = %reference, bytes = bytes.len(), "Fetched image bytes");
        let image = image::load_from_memory(&bytes)?;
        return Ok(Some(DynamicImage::ImageRgb8(image.into_rgb8())));
    }

    Ok(decode_base64_image(reference))
}
