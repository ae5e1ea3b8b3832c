//! DEFLATE compression for token payloads.
//!
//! Encrypted tokens may carry a `zip` header of `"DEF"`, in which case the
//! plaintext is compressed with raw DEFLATE (RFC 1951, no zlib or gzip
//! framing) before encryption and inflated after decryption.

pub mod deflate;
pub mod error;

// Re-export error types
pub use error::{CompressionError, Result};

/// The only `zip` header value this crate understands.
pub const DEFLATE_ZIP_ID: &str = "DEF";

/// Largest inflated payload accepted by [`deflate::decompress`]: 1 MiB.
pub const DEFAULT_MAX_INFLATED_LEN: usize = 1 << 20;
