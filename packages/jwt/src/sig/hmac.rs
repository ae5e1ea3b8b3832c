//! HS256, HS384 and HS512

use std::fmt;

use zeroize::Zeroizing;

use super::{SignatureAlgorithm, Signer};
use crate::compare::constant_time_eq;
use crate::crypto::hmac_sha2::{hmac_sign, ShaSize};
use crate::error::JwtResult;

/// HMAC-SHA2 signer holding a shared secret
pub struct Hs {
    algorithm: SignatureAlgorithm,
    sha: ShaSize,
    key: Zeroizing<Vec<u8>>,
}

impl Hs {
    /// HMAC with SHA-256
    pub fn hs256(key: impl AsRef<[u8]>) -> Self {
        Self::new(SignatureAlgorithm::Hs256, ShaSize::Sha256, key.as_ref())
    }

    /// HMAC with SHA-384
    pub fn hs384(key: impl AsRef<[u8]>) -> Self {
        Self::new(SignatureAlgorithm::Hs384, ShaSize::Sha384, key.as_ref())
    }

    /// HMAC with SHA-512
    pub fn hs512(key: impl AsRef<[u8]>) -> Self {
        Self::new(SignatureAlgorithm::Hs512, ShaSize::Sha512, key.as_ref())
    }

    fn new(algorithm: SignatureAlgorithm, sha: ShaSize, key: &[u8]) -> Self {
        Self {
            algorithm,
            sha,
            key: Zeroizing::new(key.to_vec()),
        }
    }
}

impl Signer for Hs {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        hmac_sign(self.sha, &self.key, &[payload])
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        match self.sign(payload) {
            Ok(expected) => constant_time_eq(&expected, signature),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for Hs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hs").field("algorithm", &self.algorithm).finish_non_exhaustive()
    }
}
