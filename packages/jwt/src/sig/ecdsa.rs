//! ES256, ES384 and ES512 with fixed-width `r || s` signatures

use p256::ecdsa::signature::{Signer as _, Verifier as _};

use super::{SignatureAlgorithm, Signer};
use crate::crypto::ec_signature;
use crate::error::{JwtError, JwtResult};
use crate::keys::{EcCurve, EcKey};

/// ECDSA signer bound to one curve
#[derive(Debug)]
pub struct Es {
    algorithm: SignatureAlgorithm,
    key: EcKey,
}

impl Es {
    /// ECDSA on P-256 with SHA-256
    pub fn es256(key: EcKey) -> JwtResult<Self> {
        Self::new(SignatureAlgorithm::Es256, EcCurve::P256, key)
    }

    /// ECDSA on P-384 with SHA-384
    pub fn es384(key: EcKey) -> JwtResult<Self> {
        Self::new(SignatureAlgorithm::Es384, EcCurve::P384, key)
    }

    /// ECDSA on P-521 with SHA-512
    pub fn es512(key: EcKey) -> JwtResult<Self> {
        Self::new(SignatureAlgorithm::Es512, EcCurve::P521, key)
    }

    fn new(algorithm: SignatureAlgorithm, curve: EcCurve, key: EcKey) -> JwtResult<Self> {
        if key.curve() != curve {
            return Err(JwtError::Key(format!(
                "wrong curve: {algorithm} requires {curve}, got {}",
                key.curve()
            )));
        }
        Ok(Self { algorithm, key })
    }

    /// The key this signer was built with
    pub fn key(&self) -> &EcKey {
        &self.key
    }
}

impl Signer for Es {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        let width = self.key.curve().coordinate_len();
        let missing = || JwtError::key("A private key is required to sign");
        let encoded = match &self.key {
            EcKey::P256 { signing, .. } => {
                let sig: p256::ecdsa::Signature = signing.as_ref().ok_or_else(missing)?.sign(payload);
                let (r, s) = sig.split_bytes();
                ec_signature::encode(&r, &s, width)
            }
            EcKey::P384 { signing, .. } => {
                let sig: p384::ecdsa::Signature = signing.as_ref().ok_or_else(missing)?.sign(payload);
                let (r, s) = sig.split_bytes();
                ec_signature::encode(&r, &s, width)
            }
            EcKey::P521 { signing, .. } => {
                let sig: p521::ecdsa::Signature = signing.as_ref().ok_or_else(missing)?.sign(payload);
                let (r, s) = sig.split_bytes();
                ec_signature::encode(&r, &s, width)
            }
        };
        encoded.ok_or_else(|| JwtError::key("signature integer exceeds the curve width"))
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        let Some(bytes) = ec_signature::decode(signature, self.key.curve().coordinate_len()) else {
            return false;
        };
        match &self.key {
            EcKey::P256 { verifying, .. } => p256::ecdsa::Signature::from_slice(&bytes)
                .is_ok_and(|sig| verifying.verify(payload, &sig).is_ok()),
            EcKey::P384 { verifying, .. } => p384::ecdsa::Signature::from_slice(&bytes)
                .is_ok_and(|sig| verifying.verify(payload, &sig).is_ok()),
            EcKey::P521 { verifying, .. } => p521::ecdsa::Signature::from_slice(&bytes)
                .is_ok_and(|sig| verifying.verify(payload, &sig).is_ok()),
        }
    }
}
