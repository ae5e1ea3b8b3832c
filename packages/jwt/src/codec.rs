//! Unpadded base64url, the only encoding used on the wire.
//!
//! Decoding is strict: padding characters are refused, and so is any input
//! whose length could not have been produced by [`encode`].

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

/// Reasons a segment is not valid unpadded base64url
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEncoding {
    /// Input contains `=`
    #[error("base64url input must not be padded")]
    Padded,
    /// No encoded string has this length
    #[error("base64url input has impossible length {0}")]
    Length(usize),
    /// Input contains characters outside the URL-safe alphabet
    #[error("invalid base64url input: {0}")]
    Alphabet(String),
    /// Decoded length disagrees with the encoded length
    #[error("base64url input length is inconsistent with its decoded length")]
    Inconsistent,
}

/// Encode bytes as unpadded base64url
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url
pub fn decode(input: &str) -> Result<Vec<u8>, MalformedEncoding> {
    if input.contains('=') {
        return Err(MalformedEncoding::Padded);
    }
    if input.len() % 4 == 1 {
        return Err(MalformedEncoding::Length(input.len()));
    }
    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| MalformedEncoding::Alphabet(e.to_string()))?;
    if encoded_len(decoded.len()) != input.len() {
        return Err(MalformedEncoding::Inconsistent);
    }
    Ok(decoded)
}

fn encoded_len(decoded: usize) -> usize {
    (decoded * 4).div_ceil(3)
}
