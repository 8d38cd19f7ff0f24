//! Byte-limit parsing.
//!
//! # Responsibilities
//! - Represent the maximum accepted body size in bytes
//! - Parse human-readable sizes ("100kb", "5mb") and plain integers
//! - Deserialize from either form in config files
//!
//! # Design Decisions
//! - Binary units (1kb = 1024 bytes), matching common server conventions
//! - Decimal quantities allowed ("1.5mb"); result truncated to whole bytes
//! - Unknown units are a hard error at construction time, never at request time

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Default body limit: 100 KiB.
pub const DEFAULT_LIMIT_BYTES: usize = 100 * 1024;

/// An upper bound on accepted body sizes, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(usize);

impl Limit {
    /// Limit of exactly `bytes` bytes.
    pub fn bytes(bytes: usize) -> Self {
        Self(bytes)
    }

    /// The limit in bytes.
    pub fn as_bytes(&self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT_BYTES)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b", self.0)
    }
}

impl From<usize> for Limit {
    fn from(bytes: usize) -> Self {
        Self(bytes)
    }
}

/// Error parsing a human-readable size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid byte limit \"{0}\"")]
pub struct LimitParseError(pub String);

impl FromStr for Limit {
    type Err = LimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let value: f64 = number
            .parse()
            .map_err(|_| LimitParseError(s.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(LimitParseError(s.to_string()));
        }

        let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => 1,
            "kb" => 1024,
            "mb" => 1024 * 1024,
            "gb" => 1024 * 1024 * 1024,
            _ => return Err(LimitParseError(s.to_string())),
        };

        Ok(Self((value * multiplier as f64) as usize))
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bytes(u64),
            Human(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bytes(n) => Ok(Limit(n as usize)),
            Raw::Human(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
