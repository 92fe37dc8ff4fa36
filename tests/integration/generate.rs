//! Generation flow integration tests
//!
//! Exercise POST /api/generate end-to-end against a mocked upstream:
//! plain JSON and SSE response shapes, URL and base64 image payloads,
//! and every recoverable failure path.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

/// Mount the generation endpoint mock at /v1/images and return the full URL.
async fn mount_generation(upstream: &MockServer, template: ResponseTemplate, hits: u64) -> String {
    Mock::given(method("POST"))
        .and(path("/v1/images"))
        .and(header(
            "authorization",
            format!("Bearer {}", common::constants::TEST_API_KEY).as_str(),
        ))
        .respond_with(template)
        .expect(hits)
        .mount(upstream)
        .await;
    format!("{}/v1/images", upstream.uri())
}

#[tokio::test]
async fn test_json_response_with_image_url() {
    let upstream = MockServer::start().await;
    let image_url = format!("{}/files/out.png", upstream.uri());

    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(200).set_body_json(json!({
            "data": {"result": {"images": [image_url]}}
        })),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/files/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(common::png_bytes(), "image/png"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "a red fox"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let image = body["image"].as_str().expect("image extracted");
    assert!(image.starts_with("data:image/png;base64,"));
    // The debug pane shows the parsed response, pretty-printed
    assert!(body["response"].as_str().unwrap().contains("/files/out.png"));
}

#[tokio::test]
async fn test_payload_uses_variant_field_names_and_defaults() {
    let upstream = MockServer::start().await;
    let endpoint = format!("{}/v1/images", upstream.uri());

    Mock::given(method("POST"))
        .and(path("/v1/images"))
        .and(body_partial_json(json!({
            "model": "nano-banana-fast",
            "prompt": "a red fox",
            "aspectRatio": "auto",
            "imageSize": "1K",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "a red fox"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    // No image reference anywhere in the reply
    assert!(body["image"].is_null());
}

#[tokio::test]
async fn test_reference_images_are_reencoded_and_sent() {
    let upstream = MockServer::start().await;
    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(200).set_body_json(json!({"image": common::png_data_uri()})),
        1,
    )
    .await;

    let server = common::test_server(common::test_config(&endpoint));
    // Prompt empty, but one decodable reference image: passes validation
    let response = server
        .post("/api/generate")
        .json(&json!({
            "variant": "stylize",
            "prompt": "  ",
            "images": [common::png_data_uri(), "data:image/png;base64,%%%corrupt%%%"],
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].as_str().unwrap().starts_with("data:image/png;base64,"));

    // The upstream saw the surviving reference under the variant's wire
    // field name, re-encoded as a PNG data URI.
    let requests = upstream.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let references = sent["reference_images"].as_array().unwrap();
    assert_eq!(references.len(), 1);
    assert!(references[0]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert!(sent.get("prompt").is_none());
}

#[tokio::test]
async fn test_sse_response_last_event_wins() {
    let upstream = MockServer::start().await;
    let sse_body = format!(
        "data: {{\"status\":\"working\"}}\n\ndata: {{\"image\":\"{}\"}}\n\n",
        common::png_data_uri()
    );
    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"),
        1,
    )
    .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "stream me"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].as_str().unwrap().starts_with("data:image/png;base64,"));
    // Only the final event is kept and displayed
    let debug_text = body["response"].as_str().unwrap();
    assert!(debug_text.contains("image"));
    assert!(!debug_text.contains("working"));
}

#[tokio::test]
async fn test_validation_error_issues_no_upstream_call() {
    let upstream = MockServer::start().await;
    let endpoint = mount_generation(&upstream, ResponseTemplate::new(200), 0).await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "   ", "images": []}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].is_null());
    assert_eq!(
        body["response"].as_str().unwrap(),
        "Error: provide a prompt or at least one reference image."
    );
    // MockServer verifies expect(0) on drop
}

#[tokio::test]
async fn test_upstream_error_is_reported_as_text() {
    let upstream = MockServer::start().await;
    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(500).set_body_string("backend exploded"),
        1,
    )
    .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "hello"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].is_null());
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("Error: upstream request failed"));
    assert!(text.contains("backend exploded"));
}

#[tokio::test]
async fn test_unparseable_response_shows_raw_body() {
    let upstream = MockServer::start().await;
    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(200).set_body_raw("not json at all", "text/plain"),
        1,
    )
    .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "hello"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].is_null());
    assert_eq!(body["response"].as_str().unwrap(), "not json at all");
}

#[tokio::test]
async fn test_invalid_base64_payload_yields_no_image() {
    let upstream = MockServer::start().await;
    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(200)
            .set_body_json(json!({"image": "data:image/png;base64,!!!invalid!!!"})),
        1,
    )
    .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "hello"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].is_null());
    // The parsed response is still shown for debugging
    assert!(body["response"].as_str().unwrap().contains("base64"));
}

#[tokio::test]
async fn test_unfetchable_image_url_yields_no_image() {
    let upstream = MockServer::start().await;
    let image_url = format!("{}/files/missing.png", upstream.uri());
    let endpoint = mount_generation(
        &upstream,
        ResponseTemplate::new(200).set_body_json(json!({"url": image_url})),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/files/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "studio", "prompt": "hello"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].is_null());
    assert!(body["response"].as_str().unwrap().contains("missing.png"));
}

#[tokio::test]
async fn test_unknown_variant_is_reported_as_text() {
    let upstream = MockServer::start().await;
    let endpoint = mount_generation(&upstream, ResponseTemplate::new(200), 0).await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"variant": "nope", "prompt": "hello"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["image"].is_null());
    assert_eq!(
        body["response"].as_str().unwrap(),
        "Error: unknown variant 'nope'."
    );
}

#[tokio::test]
async fn test_omitted_variant_falls_back_to_first() {
    let upstream = MockServer::start().await;
    let endpoint = format!("{}/v1/images", upstream.uri());

    // The studio variant is first; its wire fields should be used
    Mock::given(method("POST"))
        .and(path("/v1/images"))
        .and(body_partial_json(json!({"aspectRatio": "auto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = common::test_server(common::test_config(&endpoint));
    let response = server
        .post("/api/generate")
        .json(&json!({"prompt": "hello"}))
        .await;

    response.assert_status_ok();
}
