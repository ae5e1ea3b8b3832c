//! Compact JSON Web Signature and Encryption tokens
//!
//! This crate provides:
//! - Signed tokens with `none`, HS256/384/512, RS256/384/512 and ES256/384/512
//! - Encrypted tokens with A128CBC+HS256, A256CBC+HS512, A128GCM and A256GCM,
//!   keyed by `dir`, RSA1_5 or RSA-OAEP
//! - Nested tokens, optional DEFLATE compression and registered claim
//!   validation
//!
//! Decoding takes a key resolver: a closure that sees each layer's header and
//! returns the verifier or decrypter for it.
//!
//! ```no_run
//! use sigil_jwt::{decode_token, encode_token, sig::Hs, KeyResolution};
//!
//! # fn main() -> sigil_jwt::JwtResult<()> {
//! let key = b"an HMAC key of reasonable length";
//! let token = encode_token(br#"{"sub":"alice"}"#, &Hs::hs256(key), None)?;
//! let decoded = decode_token(&token, |_header, _options| {
//!     Ok(Some(KeyResolution::verifier(Hs::hs256(key))))
//! })?;
//! assert!(decoded.claims().is_some());
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod codec;
pub mod compare;
pub(crate) mod crypto;
pub mod enc;
mod error;
pub mod header;
pub mod keys;
pub mod sig;
mod token;
mod types;
pub mod validation;

pub use error::*;
pub use header::Header;
pub use token::{
    decode_header, decode_token, decode_token_with_options, encode_claims, encode_token,
    encrypt_claims, encrypt_token, KeyResolution, TokenShape,
};
pub use types::*;
pub use validation::ValidationOptions;
