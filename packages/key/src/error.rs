//! Error handling for key derivation and generation

use thiserror::Error;

/// Key-specific errors
#[derive(Debug, Clone, Error)]
pub enum KeyError {
    /// Key derivation error occurred
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),
}

impl KeyError {
    /// Create a key derivation error
    #[must_use]
    pub fn key_derivation(msg: &str) -> Self {
        Self::KeyDerivation(msg.to_string())
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
