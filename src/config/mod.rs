//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! builder calls (or deserialized JsonBodyOptions)
//!     → limit.rs (byte-limit parsing)
//!     → matcher.rs (accepted-type resolution)
//!     → options.rs (validated, immutable JsonBodyConfig)
//!     → shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Everything validatable fails at build time, not at request time
//! - String/list type forms resolve once into a single matcher
//! - The serde subset covers data-valued options only; hooks are code

pub mod limit;
pub mod matcher;
pub mod options;

pub use limit::Limit;
pub use matcher::TypeMatcher;
pub use options::{ConfigError, JsonBodyConfig, JsonBodyConfigBuilder, JsonBodyOptions};
