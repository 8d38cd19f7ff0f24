//! Accepted-type matching.
//!
//! # Responsibilities
//! - Decide whether a request's Content-Type is one this parser acts on
//! - Support a single pattern, a list of patterns, or a caller predicate
//! - Resolve the configured form once, at construction
//!
//! # Design Decisions
//! - Patterns compare against the parsed media type, never raw header text
//! - Matching is case-insensitive (media types are, per HTTP spec)
//! - Parameters (charset etc.) are ignored by matching; only essence counts

use std::fmt;
use std::sync::Arc;

use axum::http::{header, request::Parts};
use mime::Mime;

/// Caller-supplied predicate over request head.
pub type TypePredicate = Arc<dyn Fn(&Parts) -> bool + Send + Sync>;

/// Decides whether a request body should be parsed, by media type.
#[derive(Clone)]
pub enum TypeMatcher {
    /// Match against one or more media-type patterns
    /// (`application/json`, `application/*`, `*/json`, `+json`).
    Patterns(Vec<String>),

    /// Arbitrary predicate over the request head.
    Predicate(TypePredicate),
}

impl TypeMatcher {
    /// Matcher for a single pattern.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Patterns(vec![pattern.into().to_ascii_lowercase()])
    }

    /// Matcher accepting any of the given patterns.
    pub fn any_of<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Patterns(
            patterns
                .into_iter()
                .map(|p| p.into().to_ascii_lowercase())
                .collect(),
        )
    }

    /// Matcher delegating to a caller-supplied predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Parts) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Returns true if this parser should act on the request.
    pub fn matches(&self, parts: &Parts) -> bool {
        match self {
            Self::Patterns(patterns) => {
                let mime = match content_type(parts) {
                    Some(m) => m,
                    None => return false,
                };
                patterns.iter().any(|p| pattern_matches(p, &mime))
            }
            Self::Predicate(f) => f(parts),
        }
    }
}

impl Default for TypeMatcher {
    fn default() -> Self {
        Self::pattern("application/json")
    }
}

impl fmt::Debug for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patterns(p) => f.debug_tuple("Patterns").field(p).finish(),
            Self::Predicate(_) => f.debug_tuple("Predicate").field(&"..").finish(),
        }
    }
}

/// Parse the request's Content-Type header, if present and well-formed.
pub fn content_type(parts: &Parts) -> Option<Mime> {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Mime>().ok())
}

/// Match a single lowercase pattern against a parsed media type.
fn pattern_matches(pattern: &str, mime: &Mime) -> bool {
    // Bare suffix pattern: "+json" matches any `*/*+json`.
    if let Some(suffix) = pattern.strip_prefix('+') {
        return mime.suffix().map(|s| s.as_str()) == Some(suffix);
    }

    let (ptype, psub) = match pattern.split_once('/') {
        Some(parts) => parts,
        None => return false,
    };

    if ptype != "*" && ptype != mime.type_().as_str() {
        return false;
    }

    match psub {
        "*" => true,
        _ => {
            // "*+json" subtype wildcard with suffix constraint.
            if let Some(suffix) = psub.strip_prefix("*+") {
                mime.suffix().map(|s| s.as_str()) == Some(suffix)
            } else {
                psub == mime.subtype().as_str()
            }
        }
    }
}
