//! JSON request body parsing middleware for axum/tower services.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                JSON BODY LAYER                │
//!                    │                                               │
//!   Request ─────────┼─▶ gate (parsed? bodyless? type? charset?) ───┼─▶ pass through
//!                    │        │                                      │
//!                    │        ▼                                      │
//!                    │   body reader (limit, inflate, verify) ──────┼─▶ taxonomy error
//!                    │        │                                      │
//!                    │        ▼                                      │
//!                    │   json decode (strict gate, parse, reviver)  │
//!                    │        │                                      │
//!                    │        ▼                                      │
//!                    │   ParsedJson extension + replayable body ────┼─▶ inner service
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The layer never writes a success response itself; it annotates the
//! request and delegates. Failures render as their taxonomy status with a
//! JSON error document.
//!
//! ```no_run
//! use axum::{routing::post, Json, Router};
//! use json_body::{JsonBodyConfig, JsonBodyLayer, ParsedJson};
//!
//! async fn handler(ParsedJson(value): ParsedJson) -> Json<serde_json::Value> {
//!     Json(value)
//! }
//!
//! let config = JsonBodyConfig::builder()
//!     .limit_str("1mb")
//!     .strict(true)
//!     .build()
//!     .unwrap();
//!
//! let app: Router = Router::new()
//!     .route("/ingest", post(handler))
//!     .layer(JsonBodyLayer::new(config));
//! ```

// Core subsystems
pub mod body;
pub mod config;
pub mod json;

// HTTP integration
pub mod http;

// Cross-cutting concerns
pub mod error;

pub use config::{ConfigError, JsonBodyConfig, JsonBodyConfigBuilder, JsonBodyOptions, Limit, TypeMatcher};
pub use error::JsonBodyError;
pub use http::{json_body_middleware, JsonBodyLayer, JsonBodyService, ParsedJson};
pub use body::DecodedBody;
