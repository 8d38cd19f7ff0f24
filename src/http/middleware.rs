//! JSON body-parsing middleware.
//!
//! # Responsibilities
//! - Gate each request: idempotency, body presence, type, charset (in order)
//! - Drive the body reader and JSON decoder
//! - Attach the parsed value as a request extension and restore the body
//!
//! # Design Decisions
//! - Gate ordering is significant: already-parsed and bodyless checks
//!   short-circuit before any I/O; type before charset; charset before read
//! - Failures never reach the inner service; the taxonomy error renders
//!   the response
//! - The raw bytes are put back as the request body so later readers see
//!   the stream exactly as it arrived

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use tower::{Layer, Service};

use crate::body::{charset, has_body, read_body};
use crate::config::JsonBodyConfig;
use crate::error::JsonBodyError;

/// The parsed JSON document, attached to the request as an extension.
#[derive(Debug, Clone)]
pub struct ParsedJson(pub Value);

impl ParsedJson {
    /// The underlying JSON value.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<S> FromRequestParts<S> for ParsedJson
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<ParsedJson>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "JsonBodyLayer is not installed on this route",
        ))
    }
}

/// Middleware fn for `axum::middleware::from_fn_with_state`.
pub async fn json_body_middleware(
    State(config): State<Arc<JsonBodyConfig>>,
    req: Request,
    next: Next,
) -> Response {
    match process(&config, req).await {
        Ok(req) => next.run(req).await,
        Err(err) => reject(err),
    }
}

fn reject(err: JsonBodyError) -> Response {
    tracing::warn!(
        kind = err.kind(),
        status = %err.status(),
        "rejecting request body"
    );
    err.into_response()
}

/// Run the per-request gate and parse. On success the returned request
/// carries the `ParsedJson` extension and a replayable body.
async fn process(config: &JsonBodyConfig, req: Request) -> Result<Request, JsonBodyError> {
    // 1. Idempotent no-op when a body was already parsed upstream.
    if req.extensions().get::<ParsedJson>().is_some() {
        tracing::debug!("body already parsed, skipping");
        return Ok(req);
    }

    let (mut parts, body) = req.into_parts();

    // 2. Bodyless requests get the empty-object annotation, no I/O.
    if !has_body(&parts) {
        parts.extensions.insert(ParsedJson(Value::Object(Map::new())));
        return Ok(Request::from_parts(parts, body));
    }

    // 3. Foreign content types pass through untouched.
    if !config.type_matcher.matches(&parts) {
        tracing::debug!("content type not accepted, skipping");
        return Ok(Request::from_parts(parts, body));
    }

    // 4–5. Charset resolution and UTF-family gate, before any read.
    let charset_label = charset::resolve_charset(&parts);
    if !charset::is_utf_family(&charset_label) {
        return Err(JsonBodyError::CharsetUnsupported {
            charset: charset_label,
        });
    }

    // 6. Stream, bound, inflate, verify, decode.
    let read = read_body(&parts, body, config, &charset_label).await?;
    let value = crate::json::decode(&read.text, config)?;

    tracing::debug!(bytes = read.raw.len(), "request body parsed");
    parts.extensions.insert(ParsedJson(value));
    Ok(Request::from_parts(parts, Body::from(read.raw)))
}

/// Tower layer applying [`JsonBodyService`] around an inner service.
#[derive(Clone, Debug)]
pub struct JsonBodyLayer {
    config: Arc<JsonBodyConfig>,
}

impl JsonBodyLayer {
    /// Layer with the given configuration.
    pub fn new(config: JsonBodyConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for JsonBodyLayer {
    fn default() -> Self {
        Self::new(JsonBodyConfig::default())
    }
}

impl<S> Layer<S> for JsonBodyLayer {
    type Service = JsonBodyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonBodyService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service produced by [`JsonBodyLayer`].
#[derive(Clone, Debug)]
pub struct JsonBodyService<S> {
    inner: S,
    config: Arc<JsonBodyConfig>,
}

impl<S> Service<Request> for JsonBodyService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let config = self.config.clone();
        // The cloned service is the ready one; see tower's docs on Clone +
        // readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match process(&config, req).await {
                Ok(req) => inner.call(req).await,
                Err(err) => Ok(reject(err)),
            }
        })
    }
}
