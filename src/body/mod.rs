//! Body reading subsystem.
//!
//! # Data Flow
//! ```text
//! request body stream
//!     → reader.rs (frame buffering, limit, length consistency)
//!     → inflate.rs (gzip/zlib reversal, limit on inflated output)
//!     → verify hook (caller veto over raw bytes)
//!     → charset.rs (declared-charset decode to text)
//!     → json subsystem
//! ```
//!
//! # Design Decisions
//! - All failures surface as taxonomy errors; nothing is retried
//! - Raw received bytes are preserved so the request stays readable
//!   downstream of the middleware

pub mod charset;
pub mod inflate;
pub mod reader;

pub use inflate::ContentEncoding;
pub use reader::{has_body, read_body, BodyText, DecodedBody};
