//! Image reference discovery in arbitrary JSON
//!
//! Upstream APIs disagree about where the generated image lives in the
//! response. Rather than modelling every dialect, the locator walks the
//! JSON value depth-first and returns the first string that looks like
//! an image reference, preferring a fixed list of well-known key names.

use serde_json::Value;

/// Key names probed first when searching an object, in priority order.
const PRIORITY_KEYS: &[&str] = &[
    "image",
    "image_url",
    "url",
    "urls",
    "image_base64",
    "b64_json",
    "output",
    "data",
    "result",
    "results",
    "images",
];

/// Find the first plausible image reference in a JSON value.
///
/// Strings qualify only when they start with `http://`, `https://`, or
/// `data:image` — a bare base64 string is rejected on purpose, since any
/// free-form text field would otherwise be a false positive. Arrays are
/// probed element by element. Objects are probed through the priority
/// keys first; when none of them yields a hit, every remaining value is
/// probed in insertion order. First match at any depth wins.
pub fn find_image_payload(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => {
            if text.starts_with("http://")
                || text.starts_with("https://")
                || text.starts_with("data:image")
            {
                Some(text.as_str())
            } else {
                None
            }
        }
        Value::Array(items) => items.iter().find_map(find_image_payload),
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(nested) = map.get(*key) {
                    if let Some(found) = find_image_payload(nested) {
                        return Some(found);
                    }
                }
            }
            map.values().find_map(find_image_payload)
        }
        _ => None,
    }
}
