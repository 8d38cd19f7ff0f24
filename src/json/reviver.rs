//! Reviver transformation.
//!
//! # Responsibilities
//! - Walk the parsed tree bottom-up, invoking the reviver on every value
//! - Honor removal semantics: `None` drops object entries and nulls
//!   array slots; a removed root becomes `null`
//!
//! # Design Decisions
//! - Keys are passed as strings; array indices stringify, the root is `""`
//! - Children are revised before their parent sees them

use std::sync::Arc;

use serde_json::{Map, Value};

/// Caller-supplied hook applied to every (key, value) pair after parsing.
pub type Reviver = Arc<dyn Fn(&str, Value) -> Option<Value> + Send + Sync>;

/// Apply `reviver` to a parsed document.
pub fn apply(value: Value, reviver: &Reviver) -> Value {
    walk("", value, reviver).unwrap_or(Value::Null)
}

fn walk(key: &str, value: Value, reviver: &Reviver) -> Option<Value> {
    let revised = match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                if let Some(v) = walk(&k, v, reviver) {
                    out.insert(k, v);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| walk(&i.to_string(), v, reviver).unwrap_or(Value::Null))
                .collect(),
        ),
        other => other,
    };
    reviver(key, revised)
}
