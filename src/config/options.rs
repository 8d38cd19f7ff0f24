//! Parser configuration.
//!
//! # Responsibilities
//! - Hold the immutable per-instance configuration (limit, flags, hooks)
//! - Validate everything validatable at construction time
//! - Deserialize the data-only subset from config files
//!
//! # Design Decisions
//! - Config is immutable once built; shared via `Arc` across requests
//! - All fields have defaults to allow minimal setups
//! - Function-valued options (predicate, verify, reviver) exist only on the
//!   builder; the serde subset covers the data-valued options

use std::fmt;
use std::sync::Arc;

use axum::http::request::Parts;
use serde::Deserialize;
use thiserror::Error;

use crate::config::limit::{Limit, LimitParseError};
use crate::config::matcher::TypeMatcher;
use crate::json::reviver::Reviver;

/// Boxed error type for verify callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked with request head and raw body bytes before decoding.
/// An `Err` vetoes parsing with a 403.
pub type VerifyFn = Arc<dyn Fn(&Parts, &[u8]) -> Result<(), BoxError> + Send + Sync>;

/// Configuration errors reported synchronously at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Limit(#[from] LimitParseError),
}

/// Immutable configuration for a parser instance.
#[derive(Clone)]
pub struct JsonBodyConfig {
    pub(crate) limit: Limit,
    pub(crate) inflate: bool,
    pub(crate) strict: bool,
    pub(crate) type_matcher: TypeMatcher,
    pub(crate) verify: Option<VerifyFn>,
    pub(crate) reviver: Option<Reviver>,
}

impl JsonBodyConfig {
    /// Start building a configuration from defaults.
    pub fn builder() -> JsonBodyConfigBuilder {
        JsonBodyConfigBuilder::default()
    }

    /// Configured byte limit.
    pub fn limit(&self) -> usize {
        self.limit.as_bytes()
    }

    /// Whether compressed bodies are inflated.
    pub fn inflate(&self) -> bool {
        self.inflate
    }

    /// Whether only object/array roots are accepted.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for JsonBodyConfig {
    fn default() -> Self {
        Self {
            limit: Limit::default(),
            inflate: true,
            strict: true,
            type_matcher: TypeMatcher::default(),
            verify: None,
            reviver: None,
        }
    }
}

impl fmt::Debug for JsonBodyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBodyConfig")
            .field("limit", &self.limit)
            .field("inflate", &self.inflate)
            .field("strict", &self.strict)
            .field("type_matcher", &self.type_matcher)
            .field("verify", &self.verify.is_some())
            .field("reviver", &self.reviver.is_some())
            .finish()
    }
}

/// Builder for [`JsonBodyConfig`].
#[derive(Default)]
pub struct JsonBodyConfigBuilder {
    limit: Option<Result<Limit, LimitParseError>>,
    inflate: Option<bool>,
    strict: Option<bool>,
    type_matcher: Option<TypeMatcher>,
    verify: Option<VerifyFn>,
    reviver: Option<Reviver>,
}

impl JsonBodyConfigBuilder {
    /// Byte limit as a plain count.
    pub fn limit(mut self, bytes: usize) -> Self {
        self.limit = Some(Ok(Limit::bytes(bytes)));
        self
    }

    /// Byte limit as a human-readable string ("100kb", "5mb").
    /// An unparsable string fails `build()`.
    pub fn limit_str(mut self, limit: &str) -> Self {
        self.limit = Some(limit.parse());
        self
    }

    /// Whether to inflate gzip/deflate bodies (default true).
    pub fn inflate(mut self, inflate: bool) -> Self {
        self.inflate = Some(inflate);
        self
    }

    /// Whether to accept only object/array roots (default true).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Accept a single media-type pattern (default "application/json").
    pub fn content_type(mut self, pattern: impl Into<String>) -> Self {
        self.type_matcher = Some(TypeMatcher::pattern(pattern));
        self
    }

    /// Accept any of the given media-type patterns.
    pub fn content_types<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_matcher = Some(TypeMatcher::any_of(patterns));
        self
    }

    /// Accept requests matching an arbitrary predicate over the request head.
    pub fn type_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Parts) -> bool + Send + Sync + 'static,
    {
        self.type_matcher = Some(TypeMatcher::predicate(f));
        self
    }

    /// Verify hook over the raw body bytes; `Err` rejects with 403.
    pub fn verify<F>(mut self, f: F) -> Self
    where
        F: Fn(&Parts, &[u8]) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.verify = Some(Arc::new(f));
        self
    }

    /// Reviver applied bottom-up to the parsed value.
    /// Returning `None` removes the entry; the key is `""` for the root.
    pub fn reviver<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, serde_json::Value) -> Option<serde_json::Value> + Send + Sync + 'static,
    {
        self.reviver = Some(Arc::new(f));
        self
    }

    /// Finalize. Fails if a human-readable limit string did not parse.
    pub fn build(self) -> Result<JsonBodyConfig, ConfigError> {
        let limit = self.limit.transpose()?.unwrap_or_default();
        Ok(JsonBodyConfig {
            limit,
            inflate: self.inflate.unwrap_or(true),
            strict: self.strict.unwrap_or(true),
            type_matcher: self.type_matcher.unwrap_or_default(),
            verify: self.verify,
            reviver: self.reviver,
        })
    }
}

/// Data-only options, deserializable from config files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JsonBodyOptions {
    /// Byte limit; integer bytes or human string ("100kb").
    pub limit: Limit,

    /// Inflate gzip/deflate bodies.
    pub inflate: bool,

    /// Accept only object/array roots.
    pub strict: bool,

    /// Accepted media-type patterns.
    pub types: Vec<String>,
}

impl Default for JsonBodyOptions {
    fn default() -> Self {
        Self {
            limit: Limit::default(),
            inflate: true,
            strict: true,
            types: vec!["application/json".to_string()],
        }
    }
}

impl JsonBodyOptions {
    /// Continue building with function-valued options.
    pub fn into_builder(self) -> JsonBodyConfigBuilder {
        JsonBodyConfigBuilder {
            limit: Some(Ok(self.limit)),
            inflate: Some(self.inflate),
            strict: Some(self.strict),
            type_matcher: Some(TypeMatcher::any_of(self.types)),
            verify: None,
            reviver: None,
        }
    }
}
