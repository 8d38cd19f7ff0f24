//! Strict-mode root check.
//!
//! # Responsibilities
//! - Find the first non-whitespace character of the decoded text
//! - Reject roots that are not objects or arrays, before the parser runs
//! - Produce a parser-shaped message naming the real offending character
//!
//! # Design Decisions
//! - Whitespace is the JSON grammar's set (space, tab, LF, CR), not
//!   Unicode whitespace
//! - Positions are byte offsets into the decoded text

use crate::error::JsonBodyError;

/// First non-whitespace character and its byte offset.
pub fn first_char(text: &str) -> Option<(usize, char)> {
    text.char_indices()
        .find(|(_, c)| !matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// In strict mode, only `{` and `[` may open the document. Returns the
/// violation error, if any.
pub fn check(text: &str) -> Option<JsonBodyError> {
    match first_char(text) {
        Some((position, c)) if c != '{' && c != '[' => Some(JsonBodyError::EntityParseFailed {
            message: format!("Unexpected token {c} in JSON at position {position}"),
            body: text.to_string(),
        }),
        _ => None,
    }
}
