//! RS256, RS384 and RS512: RSASSA-PKCS1-v1_5 over a SHA-2 digest

use std::fmt;

use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use super::{SignatureAlgorithm, Signer};
use crate::crypto::hmac_sha2::{digest, ShaSize};
use crate::error::{JwtError, JwtResult};
use crate::keys::RsaKey;

/// RSA PKCS#1 v1.5 signer.
///
/// Built from a private key it signs and verifies; from a public key it
/// only verifies.
pub struct Rs {
    algorithm: SignatureAlgorithm,
    sha: ShaSize,
    private: Option<Box<RsaPrivateKey>>,
    public: RsaPublicKey,
}

impl Rs {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    pub fn rs256(key: impl Into<RsaKey>) -> JwtResult<Self> {
        Self::new(SignatureAlgorithm::Rs256, ShaSize::Sha256, key.into())
    }

    /// RSASSA-PKCS1-v1_5 with SHA-384
    pub fn rs384(key: impl Into<RsaKey>) -> JwtResult<Self> {
        Self::new(SignatureAlgorithm::Rs384, ShaSize::Sha384, key.into())
    }

    /// RSASSA-PKCS1-v1_5 with SHA-512
    pub fn rs512(key: impl Into<RsaKey>) -> JwtResult<Self> {
        Self::new(SignatureAlgorithm::Rs512, ShaSize::Sha512, key.into())
    }

    fn new(algorithm: SignatureAlgorithm, sha: ShaSize, key: RsaKey) -> JwtResult<Self> {
        key.check_size()?;
        let public = key.public_key();
        let private = match key {
            RsaKey::Private(private) => Some(private),
            RsaKey::Public(_) => None,
        };
        Ok(Self {
            algorithm,
            sha,
            private,
            public,
        })
    }

    fn scheme(&self) -> Pkcs1v15Sign {
        match self.sha {
            ShaSize::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            ShaSize::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
            ShaSize::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }
}

impl Signer for Rs {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        let private = self
            .private
            .as_ref()
            .ok_or_else(|| JwtError::key("A private key is required to sign"))?;
        let hashed = digest(self.sha, payload);
        private
            .sign(self.scheme(), &hashed)
            .map_err(|e| JwtError::Key(format!("RSA signing failed: {e}")))
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        let hashed = digest(self.sha, payload);
        self.public.verify(self.scheme(), &hashed, signature).is_ok()
    }
}

impl fmt::Debug for Rs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rs")
            .field("algorithm", &self.algorithm)
            .field("can_sign", &self.private.is_some())
            .finish_non_exhaustive()
    }
}
