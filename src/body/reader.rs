//! Streaming body read.
//!
//! # Responsibilities
//! - Consume the request body frame by frame, counting received bytes
//! - Enforce the byte limit and Content-Length consistency
//! - Inflate compressed encodings, run the verify hook, decode to text
//!
//! # Design Decisions
//! - A declared Content-Length above the limit fails before any frame is read
//! - Stream errors map to request.aborted with received/expected counts
//! - The raw received bytes are handed back so the request body can be
//!   reconstructed for downstream readers

use axum::body::Body;
use axum::http::{header, request::Parts};
use bytes::Bytes;
use http_body_util::BodyExt;

use crate::body::charset;
use crate::body::inflate::{inflate, ContentEncoding};
use crate::config::JsonBodyConfig;
use crate::error::JsonBodyError;

/// Extension marker set by upstream layers that have already text-decoded
/// the body stream. Reading such a request is a wiring mistake.
#[derive(Debug, Clone, Copy)]
pub struct DecodedBody;

/// Outcome of a successful body read.
#[derive(Debug)]
pub struct BodyText {
    /// Bytes exactly as received on the wire, for body reconstruction.
    pub raw: Bytes,
    /// Decoded text ready for the JSON parser.
    pub text: String,
}

/// Declared Content-Length, if present and well-formed.
pub fn content_length(parts: &Parts) -> Option<u64> {
    parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Whether the request carries a body at all, per HTTP message semantics.
pub fn has_body(parts: &Parts) -> bool {
    parts.headers.contains_key(header::TRANSFER_ENCODING) || content_length(parts).is_some()
}

/// Read, bound, inflate, verify, and decode the request body.
pub async fn read_body(
    parts: &Parts,
    body: Body,
    config: &JsonBodyConfig,
    charset_label: &str,
) -> Result<BodyText, JsonBodyError> {
    if parts.extensions.get::<DecodedBody>().is_some() {
        return Err(JsonBodyError::StreamEncodingSet);
    }

    let encoding = ContentEncoding::from_parts(parts)?;
    if encoding.is_compressed() && !config.inflate() {
        return Err(JsonBodyError::EncodingUnsupported {
            encoding: encoding.token().to_string(),
        });
    }

    let limit = config.limit();
    let declared = content_length(parts);

    // With identity encoding the declared length describes the payload
    // itself, so an oversized declaration fails without reading a byte.
    if !encoding.is_compressed() {
        if let Some(length) = declared {
            if length > limit as u64 {
                return Err(JsonBodyError::EntityTooLarge {
                    limit,
                    length: Some(length),
                });
            }
        }
    }

    let raw = collect_frames(body, encoding, limit, declared).await?;

    if !encoding.is_compressed() {
        if let Some(expected) = declared {
            if raw.len() as u64 != expected {
                return Err(JsonBodyError::RequestSizeInvalid {
                    received: raw.len(),
                    expected,
                });
            }
        }
    }

    let payload = if encoding.is_compressed() {
        Bytes::from(inflate(encoding, &raw, limit)?)
    } else {
        raw.clone()
    };

    if let Some(verify) = &config.verify {
        verify(parts, &payload).map_err(|e| JsonBodyError::EntityVerifyFailed {
            message: e.to_string(),
        })?;
    }

    let text = charset::decode(&payload, charset_label)?;
    Ok(BodyText { raw, text })
}

/// Buffer the stream, enforcing a byte cap as frames arrive. Identity
/// payloads are capped at the limit itself; compressed payloads at the
/// limit plus deflate's worst-case expansion for incompressible input
/// (a fraction of a percent plus header overhead), since the inflated
/// output gets the exact check afterwards.
async fn collect_frames(
    mut body: Body,
    encoding: ContentEncoding,
    limit: usize,
    declared: Option<u64>,
) -> Result<Bytes, JsonBodyError> {
    let cap = if encoding.is_compressed() {
        limit + limit / 16 + 64
    } else {
        limit
    };
    let mut buf: Vec<u8> = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|_| JsonBodyError::RequestAborted {
            received: buf.len(),
            expected: declared,
        })?;

        if let Ok(data) = frame.into_data() {
            buf.extend_from_slice(&data);
            if buf.len() > cap {
                return Err(JsonBodyError::EntityTooLarge {
                    limit,
                    length: declared,
                });
            }
        }
    }

    Ok(Bytes::from(buf))
}
