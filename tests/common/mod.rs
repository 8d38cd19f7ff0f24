//! Shared utilities for integration testing.

use axum::{
    body::Body,
    extract::Request,
    http::Response,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};

use json_body::{JsonBodyConfig, JsonBodyLayer, ParsedJson};

/// Router with one echo route behind the JSON body layer.
pub fn app(config: JsonBodyConfig) -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route("/inspect", post(inspect))
        .layer(JsonBodyLayer::new(config))
}

/// Echoes the parsed body back; 500s if the layer is missing.
async fn echo(ParsedJson(value): ParsedJson) -> Json<Value> {
    Json(value)
}

/// Reports whether a parsed body was attached at all.
async fn inspect(req: Request) -> Json<Value> {
    match req.extensions().get::<ParsedJson>() {
        Some(parsed) => Json(json!({ "parsed": parsed.0 })),
        None => Json(json!({ "skipped": true })),
    }
}

/// Build a POST request with the given headers and body bytes.
pub fn post_request(path: &str, headers: &[(&str, &str)], body: impl Into<Body>) -> Request {
    let mut builder = Request::builder().method("POST").uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(body.into()).unwrap()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
