//! # Sigil Key Material
//!
//! Key derivation and key generation used by the token engine:
//!
//! - **Concat KDF**: splits one content master key into independent
//!   encryption and integrity keys with domain separation by label
//! - **Entropy**: CSPRNG-backed content master keys and IVs held in
//!   zeroize-on-drop buffers

#![forbid(unsafe_code)]

pub mod entropy;
pub mod error;
pub mod kdf;

// Re-export core types
pub use error::{KeyError, Result};
pub use kdf::concat_kdf;
