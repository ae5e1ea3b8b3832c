//! Raw DEFLATE (RFC 1951) compression

use crate::{CompressionError, Result, DEFAULT_MAX_INFLATED_LEN};
use flate2::Compression;
use flate2::read::{DeflateDecoder, DeflateEncoder};
use std::io::Read;

/// Compress data with raw DEFLATE at the default level
///
/// # Errors
/// Returns `CompressionError::CompressionFailed` if the encoder fails
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_level(data, Compression::default().level())
}

/// Compress data with raw DEFLATE at an explicit level
///
/// Levels above 9 are clamped to 9.
///
/// # Errors
/// Returns `CompressionError::CompressionFailed` if the encoder fails
pub fn compress_with_level(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(data, Compression::new(level.min(9)));
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).map_err(|e| {
        CompressionError::compression_failed(format!("Deflate compression failed: {e}"))
    })?;

    tracing::trace!(
        input_len = data.len(),
        output_len = compressed.len(),
        "deflated payload"
    );
    Ok(compressed)
}

/// Inflate raw DEFLATE data of at most [`DEFAULT_MAX_INFLATED_LEN`] bytes
///
/// # Errors
/// Returns `CompressionError::DecompressionFailed` if the stream is corrupt
/// or truncated, and `CompressionError::LimitExceeded` if it inflates past
/// the limit
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_limit(data, DEFAULT_MAX_INFLATED_LEN)
}

/// Inflate raw DEFLATE data, refusing output longer than `max_len` bytes
///
/// Inflation stops one byte past the limit, so a hostile stream never
/// costs more than `max_len + 1` bytes of memory.
///
/// # Errors
/// Returns `CompressionError::DecompressionFailed` if the stream is corrupt
/// or truncated, and `CompressionError::LimitExceeded` if it inflates past
/// `max_len`
pub fn decompress_with_limit(data: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let cap = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
    let mut decoder = DeflateDecoder::new(data).take(cap);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).map_err(|e| {
        CompressionError::decompression_failed(format!("Deflate decompression failed: {e}"))
    })?;

    if decompressed.len() > max_len {
        tracing::warn!(max_len, input_len = data.len(), "inflated payload exceeds limit");
        return Err(CompressionError::LimitExceeded(max_len));
    }
    Ok(decompressed)
}
