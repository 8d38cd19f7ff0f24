//! Charset resolution and text decoding.
//!
//! # Responsibilities
//! - Resolve the declared charset from the Content-Type header
//! - Gate on the UTF family before any body I/O happens
//! - Decode buffered bytes to text with the resolved charset
//!
//! # Design Decisions
//! - Absent or unparsable Content-Type defaults to utf-8
//! - The family gate is a prefix check ("utf-", ASCII case-insensitive);
//!   the charset is otherwise preserved exactly as sent for diagnostics
//! - UTF-8 decodes through std validation; other UTF variants go through
//!   encoding_rs label lookup

use axum::http::request::Parts;

use crate::config::matcher::content_type;
use crate::error::JsonBodyError;

/// Charset declared by the request, defaulting to utf-8.
pub fn resolve_charset(parts: &Parts) -> String {
    content_type(parts)
        .and_then(|ct| ct.get_param(mime::CHARSET).map(|cs| cs.as_str().to_string()))
        .unwrap_or_else(|| "utf-8".to_string())
}

/// Whether the charset belongs to the UTF family this parser accepts.
pub fn is_utf_family(charset: &str) -> bool {
    let bytes = charset.as_bytes();
    bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"utf-")
}

/// Decode body bytes using an already-gated UTF charset.
pub fn decode(bytes: &[u8], charset: &str) -> Result<String, JsonBodyError> {
    if charset.eq_ignore_ascii_case("utf-8") {
        return String::from_utf8(bytes.to_vec()).map_err(|e| JsonBodyError::EntityParseFailed {
            message: e.to_string(),
            body: String::from_utf8_lossy(bytes).into_owned(),
        });
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        JsonBodyError::CharsetUnsupported {
            charset: charset.to_string(),
        }
    })?;

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(JsonBodyError::EntityParseFailed {
            message: format!("invalid {charset} byte sequence"),
            body: text.into_owned(),
        });
    }
    Ok(text.into_owned())
}
