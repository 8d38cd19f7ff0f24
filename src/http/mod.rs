//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → middleware.rs (gate ordering, body read, JSON decode)
//!     → ParsedJson extension on the request
//!     → inner service (handlers extract ParsedJson)
//! ```

pub mod middleware;

pub use middleware::{json_body_middleware, JsonBodyLayer, JsonBodyService, ParsedJson};
