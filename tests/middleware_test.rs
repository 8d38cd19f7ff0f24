//! Integration tests for the JSON body layer, driven through an axum
//! router with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use json_body::{DecodedBody, JsonBodyConfig};

mod common;
use common::{app, post_request, response_json};

fn default_app() -> axum::Router {
    app(JsonBodyConfig::default())
}

fn json_headers(len: usize) -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("content-length".to_string(), len.to_string()),
    ]
}

async fn post_json(router: axum::Router, path: &str, body: &'static str) -> axum::http::Response<Body> {
    let headers = json_headers(body.len());
    let headers: Vec<(&str, &str)> = headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    router
        .oneshot(post_request(path, &headers, Body::from(body)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_parses_object_body() {
    let response = post_json(default_app(), "/echo", r#"{"name":"x","n":[1,2]}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({"name": "x", "n": [1, 2]})
    );
}

#[tokio::test]
async fn test_parses_array_body() {
    let response = post_json(default_app(), "/echo", r#"[1, "two", null]"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!([1, "two", null]));
}

#[tokio::test]
async fn test_empty_body_is_empty_object_regardless_of_strict() {
    for strict in [true, false] {
        let config = JsonBodyConfig::builder().strict(strict).build().unwrap();
        let response = post_json(app(config), "/echo", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({}));
    }
}

#[tokio::test]
async fn test_scalar_roots_rejected_in_strict_mode() {
    for scalar in ["42", "true", "\"x\""] {
        let response = post_json(default_app(), "/echo", scalar).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let doc = response_json(response).await;
        assert_eq!(doc["error"]["kind"], "entity.parse.failed");
        assert_eq!(doc["error"]["body"], scalar);
    }
}

#[tokio::test]
async fn test_scalar_roots_accepted_without_strict() {
    let config = JsonBodyConfig::builder().strict(false).build().unwrap();
    let response = post_json(app(config), "/echo", "42").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!(42));
}

#[tokio::test]
async fn test_strict_violation_names_offending_character() {
    let response = post_json(default_app(), "/echo", "\"abc\"").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let doc = response_json(response).await;
    assert_eq!(
        doc["error"]["message"],
        "Unexpected token \" in JSON at position 0"
    );
}

#[tokio::test]
async fn test_unsupported_charset() {
    let body = "{}";
    let response = default_app()
        .oneshot(post_request(
            "/echo",
            &[
                ("content-type", "application/json; charset=iso-8859-1"),
                ("content-length", "2"),
            ],
            Body::from(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "charset.unsupported");
    assert_eq!(doc["error"]["charset"], "iso-8859-1");
}

#[tokio::test]
async fn test_utf16_body_decodes() {
    // {"a":1} in UTF-16LE with BOM.
    let mut bytes = vec![0xff, 0xfe];
    for unit in "{\"a\":1}".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let len = bytes.len().to_string();

    let response = default_app()
        .oneshot(post_request(
            "/echo",
            &[
                ("content-type", "application/json; charset=utf-16"),
                ("content-length", &len),
            ],
            Body::from(bytes),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"a": 1}));
}

#[tokio::test]
async fn test_body_over_limit() {
    let config = JsonBodyConfig::builder().limit(16).build().unwrap();
    let body = r#"{"data":"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"}"#;
    let response = post_json(app(config), "/echo", body).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "entity.too.large");
    assert_eq!(doc["error"]["limit"], 16);
    assert_eq!(doc["error"]["length"], body.len());
}

#[tokio::test]
async fn test_foreign_content_type_passes_through() {
    let response = default_app()
        .oneshot(post_request(
            "/inspect",
            &[("content-type", "text/plain"), ("content-length", "3")],
            Body::from("abc"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"skipped": true}));
}

#[tokio::test]
async fn test_bodyless_request_gets_empty_object() {
    let response = default_app()
        .oneshot(post_request("/inspect", &[], Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"parsed": {}}));
}

#[tokio::test]
async fn test_round_trip() {
    let original = json!({
        "nested": {"list": [1, "two", null, {"deep": true}]},
        "empty": {},
    });
    let encoded = serde_json::to_string(&original).unwrap();
    let len = encoded.len().to_string();

    let response = default_app()
        .oneshot(post_request(
            "/echo",
            &[("content-type", "application/json"), ("content-length", &len)],
            Body::from(encoded),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, original);
}

#[tokio::test]
async fn test_gzip_body_inflates() {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(br#"{"compressed":true}"#).unwrap();
    let compressed = encoder.finish().unwrap();
    let len = compressed.len().to_string();

    let response = default_app()
        .oneshot(post_request(
            "/echo",
            &[
                ("content-type", "application/json"),
                ("content-encoding", "gzip"),
                ("content-length", &len),
            ],
            Body::from(compressed),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"compressed": true}));
}

#[tokio::test]
async fn test_compressed_body_rejected_when_inflate_disabled() {
    let config = JsonBodyConfig::builder().inflate(false).build().unwrap();
    let response = app(config)
        .oneshot(post_request(
            "/echo",
            &[
                ("content-type", "application/json"),
                ("content-encoding", "gzip"),
                ("content-length", "8"),
            ],
            Body::from("whatever"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "encoding.unsupported");
    assert_eq!(doc["error"]["encoding"], "gzip");
}

#[tokio::test]
async fn test_length_mismatch_rejected() {
    let response = default_app()
        .oneshot(post_request(
            "/echo",
            &[("content-type", "application/json"), ("content-length", "64")],
            Body::from("{}"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "request.size.invalid");
    assert_eq!(doc["error"]["received"], 2);
    assert_eq!(doc["error"]["expected"], 64);
}

#[tokio::test]
async fn test_verify_callback_vetoes() {
    let config = JsonBodyConfig::builder()
        .verify(|_, raw| {
            if raw.starts_with(b"{\"allowed\"") {
                Ok(())
            } else {
                Err("payload rejected by policy".into())
            }
        })
        .build()
        .unwrap();

    let response = post_json(app(config.clone()), "/echo", r#"{"allowed":1}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app(config), "/echo", r#"{"denied":1}"#).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "entity.verify.failed");
}

#[tokio::test]
async fn test_custom_type_patterns() {
    let config = JsonBodyConfig::builder()
        .content_types(["application/*+json"])
        .build()
        .unwrap();

    let response = app(config.clone())
        .oneshot(post_request(
            "/echo",
            &[
                ("content-type", "application/vnd.api+json"),
                ("content-length", "7"),
            ],
            Body::from(r#"{"a":1}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Plain application/json no longer matches this pattern.
    let response = app(config)
        .oneshot(post_request(
            "/inspect",
            &[("content-type", "application/json"), ("content-length", "7")],
            Body::from(r#"{"a":1}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response_json(response).await, json!({"skipped": true}));
}

#[tokio::test]
async fn test_reviver_shapes_result() {
    let config = JsonBodyConfig::builder()
        .reviver(|key, value| if key == "password" { None } else { Some(value) })
        .build()
        .unwrap();

    let response = post_json(app(config), "/echo", r#"{"user":"x","password":"hunter2"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"user": "x"}));
}

#[tokio::test]
async fn test_predecoded_stream_is_server_error() {
    let mut request = post_request(
        "/echo",
        &[("content-type", "application/json"), ("content-length", "2")],
        Body::from("{}"),
    );
    request.extensions_mut().insert(DecodedBody);

    let response = default_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "stream.encoding.set");
}

#[tokio::test]
async fn test_malformed_json_reports_parser_message() {
    let response = post_json(default_app(), "/echo", r#"{"a":"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let doc = response_json(response).await;
    assert_eq!(doc["error"]["kind"], "entity.parse.failed");
    assert_eq!(doc["error"]["body"], r#"{"a":"#);
    assert!(doc["error"]["message"].as_str().unwrap().len() > 0);
}
