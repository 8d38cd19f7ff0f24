//! JSON decoding subsystem.
//!
//! # Data Flow
//! ```text
//! decoded body text
//!     → empty short-circuit ({} for zero-length bodies)
//!     → strict.rs (object/array root gate, when enabled)
//!     → serde_json (the actual parser)
//!     → reviver.rs (optional bottom-up transformation)
//! ```
//!
//! # Design Decisions
//! - Parser failures carry only the parser message and the raw body text;
//!   no parser-internal state leaks into the error
//! - Empty bodies are a deliberate convenience: `{}` without touching the
//!   parser or the strict gate

pub mod reviver;
pub mod strict;

use serde_json::{Map, Value};

use crate::config::JsonBodyConfig;
use crate::error::JsonBodyError;

/// Decode body text into a JSON value per the configured rules.
pub fn decode(text: &str, config: &JsonBodyConfig) -> Result<Value, JsonBodyError> {
    if text.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    if config.strict() {
        if let Some(violation) = strict::check(text) {
            return Err(violation);
        }
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| JsonBodyError::EntityParseFailed {
            message: e.to_string(),
            body: text.to_string(),
        })?;

    Ok(match &config.reviver {
        Some(r) => reviver::apply(value, r),
        None => value,
    })
}
