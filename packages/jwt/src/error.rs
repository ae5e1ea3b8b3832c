//! Error taxonomy for token construction, decoding and claim validation

use sigil_compression::CompressionError;
use sigil_key::KeyError;
use thiserror::Error;

use crate::codec::MalformedEncoding;

/// Token operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors raised by the token engine.
///
/// `Key` is raised for unusable key material at construction time. The other
/// four are token errors. Claim failures are a kind of invalid token, and an
/// expired token is a kind of claim failure; the `is_*` predicates follow
/// that hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Key material has the wrong size, type or curve
    #[error("Invalid key: {0}")]
    Key(String),
    /// Token is malformed, tampered or cannot be decrypted
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    /// A claim failed validation
    #[error("Invalid claim: {0}")]
    Claim(String),
    /// The `exp` claim lies in the past
    #[error("Token has expired: {0}")]
    ExpiredToken(String),
    /// The token names an algorithm this engine does not implement
    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),
}

impl JwtError {
    /// Create a key error
    #[inline]
    #[must_use]
    pub fn key(msg: &str) -> Self {
        JwtError::Key(msg.to_string())
    }

    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: &str) -> Self {
        JwtError::InvalidToken(msg.to_string())
    }

    /// Create a claim error
    #[inline]
    #[must_use]
    pub fn claim(msg: &str) -> Self {
        JwtError::Claim(msg.to_string())
    }

    /// Create an expired token error
    #[inline]
    #[must_use]
    pub fn expired(msg: &str) -> Self {
        JwtError::ExpiredToken(msg.to_string())
    }

    /// Create an unsupported token error
    #[inline]
    #[must_use]
    pub fn unsupported(msg: &str) -> Self {
        JwtError::UnsupportedToken(msg.to_string())
    }

    /// True for every error describing a presented token rather than a key
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        !matches!(self, JwtError::Key(_))
    }

    /// True for invalid tokens, including every claim failure
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            JwtError::InvalidToken(_) | JwtError::Claim(_) | JwtError::ExpiredToken(_)
        )
    }

    /// True for claim failures, including expiry
    #[must_use]
    pub fn is_claim_error(&self) -> bool {
        matches!(self, JwtError::Claim(_) | JwtError::ExpiredToken(_))
    }
}

impl From<KeyError> for JwtError {
    fn from(err: KeyError) -> Self {
        JwtError::Key(err.to_string())
    }
}

impl From<MalformedEncoding> for JwtError {
    fn from(err: MalformedEncoding) -> Self {
        JwtError::InvalidToken(err.to_string())
    }
}

impl From<CompressionError> for JwtError {
    fn from(err: CompressionError) -> Self {
        JwtError::InvalidToken(err.to_string())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::InvalidToken(format!("JSON error: {err}"))
    }
}
