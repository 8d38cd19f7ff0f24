//! Error taxonomy for body parsing.
//!
//! # Responsibilities
//! - One variant per observable failure kind, with a stable kind string
//! - Map each kind to its authoritative HTTP status
//! - Render as a response (status + JSON error document)
//!
//! # Design Decisions
//! - Errors are fresh minimal values: only the fields in the taxonomy,
//!   no parser-internal state carried along
//! - The surrounding framework owns presentation; `IntoResponse` here is
//!   the axum-native hook, nothing more

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to the client while gating, reading, or parsing a body.
#[derive(Debug, Error)]
pub enum JsonBodyError {
    /// Declared charset is not a UTF family encoding.
    #[error("unsupported charset \"{charset}\"")]
    CharsetUnsupported { charset: String },

    /// Content-Encoding is unknown, or inflation is disabled.
    #[error("unsupported content encoding \"{encoding}\"")]
    EncodingUnsupported { encoding: String },

    /// Body exceeded the configured byte limit.
    #[error("request entity too large")]
    EntityTooLarge {
        limit: usize,
        length: Option<u64>,
    },

    /// JSON syntax error, including strict-mode violations.
    #[error("{message}")]
    EntityParseFailed { message: String, body: String },

    /// Caller-supplied verify callback rejected the raw body.
    #[error("entity verification failed: {message}")]
    EntityVerifyFailed { message: String },

    /// Client disconnected before the body completed.
    #[error("request aborted")]
    RequestAborted {
        received: usize,
        expected: Option<u64>,
    },

    /// Actual byte count did not match the declared Content-Length.
    #[error("request size did not match content length")]
    RequestSizeInvalid { received: usize, expected: u64 },

    /// Body stream was text-decoded by an upstream layer before we read it.
    #[error("stream encoding should not be set")]
    StreamEncodingSet,
}

impl JsonBodyError {
    /// Machine-readable kind string, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CharsetUnsupported { .. } => "charset.unsupported",
            Self::EncodingUnsupported { .. } => "encoding.unsupported",
            Self::EntityTooLarge { .. } => "entity.too.large",
            Self::EntityParseFailed { .. } => "entity.parse.failed",
            Self::EntityVerifyFailed { .. } => "entity.verify.failed",
            Self::RequestAborted { .. } => "request.aborted",
            Self::RequestSizeInvalid { .. } => "request.size.invalid",
            Self::StreamEncodingSet => "stream.encoding.set",
        }
    }

    /// Authoritative HTTP status for this kind.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::CharsetUnsupported { .. } | Self::EncodingUnsupported { .. } => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::EntityTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::EntityParseFailed { .. }
            | Self::RequestAborted { .. }
            | Self::RequestSizeInvalid { .. } => StatusCode::BAD_REQUEST,
            Self::EntityVerifyFailed { .. } => StatusCode::FORBIDDEN,
            Self::StreamEncodingSet => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for JsonBodyError {
    fn into_response(self) -> Response {
        let mut doc = json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });
        let extra = &mut doc["error"];
        match &self {
            Self::CharsetUnsupported { charset } => {
                extra["charset"] = json!(charset);
            }
            Self::EncodingUnsupported { encoding } => {
                extra["encoding"] = json!(encoding);
            }
            Self::EntityTooLarge { limit, length } => {
                extra["limit"] = json!(limit);
                extra["length"] = json!(length);
            }
            Self::EntityParseFailed { body, .. } => {
                extra["body"] = json!(body);
            }
            Self::RequestAborted { received, expected } => {
                extra["received"] = json!(received);
                extra["expected"] = json!(expected);
            }
            Self::RequestSizeInvalid { received, expected } => {
                extra["received"] = json!(received);
                extra["expected"] = json!(expected);
            }
            Self::EntityVerifyFailed { .. } | Self::StreamEncodingSet => {}
        }

        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            doc.to_string(),
        )
            .into_response()
    }
}
