//! Signature family: `none`, HMAC, RSA PKCS#1 v1.5 and ECDSA

mod ecdsa;
mod hmac;
mod rsa;

use std::fmt;
use std::sync::Arc;

pub use self::ecdsa::Es;
pub use self::hmac::Hs;
pub use self::rsa::Rs;

use crate::error::JwtResult;

/// Signing and verification capability.
///
/// `verify` never fails: a malformed or foreign signature is simply invalid.
pub trait Signer: Send + Sync {
    /// Header `alg` value
    fn name(&self) -> &'static str;

    /// Sign the JWS secured input
    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>>;

    /// Check `signature` over the JWS secured input
    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool;
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        (**self).sign(payload)
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        (**self).verify(signature, payload)
    }
}

impl<T: Signer + ?Sized> Signer for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        (**self).sign(payload)
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        (**self).verify(signature, payload)
    }
}

/// The unsecured `none` algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoneSigner;

/// Shared `none` signer, also the verifier used when a resolver yields nothing
pub const NONE: NoneSigner = NoneSigner;

impl Signer for NoneSigner {
    fn name(&self) -> &'static str {
        SignatureAlgorithm::None.name()
    }

    fn sign(&self, _payload: &[u8]) -> JwtResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn verify(&self, signature: &[u8], _payload: &[u8]) -> bool {
        signature.is_empty()
    }
}

/// Every `alg` value the signature family implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// No signature
    None,
    /// HMAC with SHA-256
    Hs256,
    /// HMAC with SHA-384
    Hs384,
    /// HMAC with SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    Rs512,
    /// ECDSA on P-256 with SHA-256
    Es256,
    /// ECDSA on P-384 with SHA-384
    Es384,
    /// ECDSA on P-521 with SHA-512
    Es512,
}

impl SignatureAlgorithm {
    /// All implemented algorithms
    pub const ALL: [SignatureAlgorithm; 10] = [
        SignatureAlgorithm::None,
        SignatureAlgorithm::Hs256,
        SignatureAlgorithm::Hs384,
        SignatureAlgorithm::Hs512,
        SignatureAlgorithm::Rs256,
        SignatureAlgorithm::Rs384,
        SignatureAlgorithm::Rs512,
        SignatureAlgorithm::Es256,
        SignatureAlgorithm::Es384,
        SignatureAlgorithm::Es512,
    ];

    /// Header `alg` value
    pub fn name(self) -> &'static str {
        match self {
            SignatureAlgorithm::None => "none",
            SignatureAlgorithm::Hs256 => "HS256",
            SignatureAlgorithm::Hs384 => "HS384",
            SignatureAlgorithm::Hs512 => "HS512",
            SignatureAlgorithm::Rs256 => "RS256",
            SignatureAlgorithm::Rs384 => "RS384",
            SignatureAlgorithm::Rs512 => "RS512",
            SignatureAlgorithm::Es256 => "ES256",
            SignatureAlgorithm::Es384 => "ES384",
            SignatureAlgorithm::Es512 => "ES512",
        }
    }

    /// Look up an `alg` value; names are case-sensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.name() == name)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
