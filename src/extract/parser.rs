//! Upstream response body normalization
//!
//! Generation endpoints answer either with a plain JSON document or with
//! an SSE-style event stream (`data: <json>` lines). Both shapes are
//! folded into a single JSON value here so the rest of the pipeline
//! never has to care which one the upstream picked.

use serde_json::Value;

/// Normalize a response body into a single JSON value.
///
/// Tries a direct JSON parse of the whole body first. If the body is not
/// valid JSON it is re-read as an event stream: every `data:` line is
/// parsed on its own, and the last line that yields a JSON object wins.
/// Earlier events are discarded, not merged.
///
/// Malformed lines and non-object events are skipped silently; this
/// function never fails.
pub fn parse_response_payload(body: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body) {
        // A literal `null` body parses fine but carries no payload.
        Ok(Value::Null) => return None,
        Ok(value) => return Some(value),
        Err(_) => {}
    }

    let mut last_event: Option<Value> = None;
    for raw_line in body.lines() {
        let line = raw_line.trim();
        let Some(rest) = line.strip_prefix("data:") else {
            continue;
        };
        let content = rest.trim();
        if content.is_empty() {
            continue;
        }
        if let Ok(event @ Value::Object(_)) = serde_json::from_str::<Value>(content) {
            last_event = Some(event);
        }
    }

    last_event
}
