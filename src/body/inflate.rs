//! Content-encoding inflation.
//!
//! # Responsibilities
//! - Classify the declared Content-Encoding
//! - Reverse gzip/deflate compression on buffered bytes
//! - Enforce the byte limit on the *inflated* output
//!
//! # Design Decisions
//! - "deflate" means the zlib-wrapped stream, matching what HTTP clients send
//! - The limit applies to decompressed size; compressed size is what the
//!   declared Content-Length describes, so length consistency is not checked
//!   on this path
//! - Corrupt compressed data is a malformed entity (400), not a server fault

use std::io::Read;

use axum::http::{header, request::Parts};
use flate2::read::{GzDecoder, ZlibDecoder};

use crate::error::JsonBodyError;

/// Supported content encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
}

impl ContentEncoding {
    /// Classify the request's Content-Encoding header.
    /// Unknown or multiple encodings are rejected with `encoding.unsupported`.
    pub fn from_parts(parts: &Parts) -> Result<Self, JsonBodyError> {
        let raw = match parts.headers.get(header::CONTENT_ENCODING) {
            Some(v) => v.to_str().map_err(|_| JsonBodyError::EncodingUnsupported {
                encoding: String::from_utf8_lossy(v.as_bytes()).into_owned(),
            })?,
            None => return Ok(Self::Identity),
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "identity" => Ok(Self::Identity),
            "gzip" | "x-gzip" => Ok(Self::Gzip),
            "deflate" => Ok(Self::Deflate),
            other => Err(JsonBodyError::EncodingUnsupported {
                encoding: other.to_string(),
            }),
        }
    }

    /// Whether the body arrives compressed.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::Identity)
    }

    /// Header token for diagnostics.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
        }
    }
}

/// Decompress a fully buffered body, enforcing `limit` on the output size.
pub fn inflate(
    encoding: ContentEncoding,
    compressed: &[u8],
    limit: usize,
) -> Result<Vec<u8>, JsonBodyError> {
    let mut out = Vec::new();
    // Read one byte past the limit so overflow is distinguishable from an
    // exact fit.
    let cap = limit as u64 + 1;
    let read = match encoding {
        ContentEncoding::Identity => return Ok(compressed.to_vec()),
        ContentEncoding::Gzip => GzDecoder::new(compressed).take(cap).read_to_end(&mut out),
        ContentEncoding::Deflate => ZlibDecoder::new(compressed).take(cap).read_to_end(&mut out),
    };

    match read {
        Ok(_) if out.len() > limit => Err(JsonBodyError::EntityTooLarge {
            limit,
            length: None,
        }),
        Ok(_) => Ok(out),
        Err(e) => Err(JsonBodyError::EntityParseFailed {
            message: format!("invalid {} body: {}", encoding.token(), e),
            body: String::from_utf8_lossy(compressed).into_owned(),
        }),
    }
}
