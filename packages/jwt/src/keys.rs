//! Asymmetric key material for the RSA and ECDSA families
//!
//! Keys are parsed from PKCS#8 / SPKI DER or PEM, or generated in place.
//! A private key always carries its public half, so one key value can both
//! sign and verify, or wrap and unwrap.

use std::fmt;

use rand_core::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::{JwtError, JwtResult};

/// Smallest RSA modulus accepted, in bits
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// RSA key, private or public
#[derive(Clone)]
pub enum RsaKey {
    /// Private key; its public half is derived on demand
    Private(Box<RsaPrivateKey>),
    /// Public key only
    Public(RsaPublicKey),
}

impl RsaKey {
    /// Generate a fresh private key of `bits` modulus length
    pub fn generate(bits: usize) -> JwtResult<Self> {
        if bits < MIN_RSA_KEY_BITS {
            return Err(JwtError::Key(format!(
                "RSA keys must be at least {MIN_RSA_KEY_BITS} bits, got {bits}"
            )));
        }
        let key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| JwtError::Key(format!("RSA key generation failed: {e}")))?;
        Ok(RsaKey::Private(Box::new(key)))
    }

    /// Parse a PKCS#8 DER private key
    pub fn from_pkcs8_der(der: &[u8]) -> JwtResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| JwtError::Key(format!("Invalid RSA private key: {e}")))?;
        Ok(RsaKey::Private(Box::new(key)))
    }

    /// Parse a PKCS#8 PEM private key
    pub fn from_pkcs8_pem(pem: &str) -> JwtResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtError::Key(format!("Invalid RSA private key: {e}")))?;
        Ok(RsaKey::Private(Box::new(key)))
    }

    /// Parse an SPKI DER public key
    pub fn from_public_key_der(der: &[u8]) -> JwtResult<Self> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| JwtError::Key(format!("Invalid RSA public key: {e}")))?;
        Ok(RsaKey::Public(key))
    }

    /// Parse an SPKI PEM public key
    pub fn from_public_key_pem(pem: &str) -> JwtResult<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| JwtError::Key(format!("Invalid RSA public key: {e}")))?;
        Ok(RsaKey::Public(key))
    }

    /// The private key, if this is one
    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        match self {
            RsaKey::Private(key) => Some(key.as_ref()),
            RsaKey::Public(_) => None,
        }
    }

    /// The public half
    pub fn public_key(&self) -> RsaPublicKey {
        match self {
            RsaKey::Private(key) => key.to_public_key(),
            RsaKey::Public(key) => key.clone(),
        }
    }

    /// A public-only copy of this key
    #[must_use]
    pub fn to_public(&self) -> Self {
        RsaKey::Public(self.public_key())
    }

    /// Modulus length in bits
    pub fn bits(&self) -> usize {
        match self {
            RsaKey::Private(key) => key.size() * 8,
            RsaKey::Public(key) => key.size() * 8,
        }
    }

    pub(crate) fn check_size(&self) -> JwtResult<()> {
        if self.bits() < MIN_RSA_KEY_BITS {
            return Err(JwtError::Key(format!(
                "RSA keys must be at least {MIN_RSA_KEY_BITS} bits, got {}",
                self.bits()
            )));
        }
        Ok(())
    }
}

impl From<RsaPrivateKey> for RsaKey {
    fn from(key: RsaPrivateKey) -> Self {
        RsaKey::Private(Box::new(key))
    }
}

impl From<RsaPublicKey> for RsaKey {
    fn from(key: RsaPublicKey) -> Self {
        RsaKey::Public(key)
    }
}

impl fmt::Debug for RsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.private_key().is_some() { "private" } else { "public" };
        f.debug_struct("RsaKey")
            .field("kind", &kind)
            .field("bits", &self.bits())
            .finish()
    }
}

/// NIST prime curves used by the ES family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// P-256, used by ES256
    P256,
    /// P-384, used by ES384
    P384,
    /// P-521, used by ES512
    P521,
}

impl EcCurve {
    /// Curve name as written in key metadata
    pub fn name(self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Width of one signature integer: `ceil(prime_bits / 8)`
    pub fn coordinate_len(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ECDSA key on one of the supported curves.
///
/// The verifying key is always present; the signing key only for private keys.
#[derive(Clone)]
pub enum EcKey {
    /// P-256 key
    P256 {
        /// Private scalar, absent for public keys
        signing: Option<p256::ecdsa::SigningKey>,
        /// Public point
        verifying: p256::ecdsa::VerifyingKey,
    },
    /// P-384 key
    P384 {
        /// Private scalar, absent for public keys
        signing: Option<p384::ecdsa::SigningKey>,
        /// Public point
        verifying: p384::ecdsa::VerifyingKey,
    },
    /// P-521 key
    P521 {
        /// Private scalar, absent for public keys
        signing: Option<p521::ecdsa::SigningKey>,
        /// Public point
        verifying: p521::ecdsa::VerifyingKey,
    },
}

impl EcKey {
    /// Generate a fresh private key on `curve`
    pub fn generate(curve: EcCurve) -> Self {
        match curve {
            EcCurve::P256 => {
                let signing = p256::ecdsa::SigningKey::random(&mut OsRng);
                let verifying = *signing.verifying_key();
                EcKey::P256 { signing: Some(signing), verifying }
            }
            EcCurve::P384 => {
                let signing = p384::ecdsa::SigningKey::random(&mut OsRng);
                let verifying = *signing.verifying_key();
                EcKey::P384 { signing: Some(signing), verifying }
            }
            EcCurve::P521 => {
                let signing = p521::ecdsa::SigningKey::random(&mut OsRng);
                let verifying = p521::ecdsa::VerifyingKey::from(&signing);
                EcKey::P521 { signing: Some(signing), verifying }
            }
        }
    }

    /// Parse a PKCS#8 DER private key; the curve is taken from the key
    pub fn from_pkcs8_der(der: &[u8]) -> JwtResult<Self> {
        if let Ok(signing) = p256::ecdsa::SigningKey::from_pkcs8_der(der) {
            let verifying = *signing.verifying_key();
            return Ok(EcKey::P256 { signing: Some(signing), verifying });
        }
        if let Ok(signing) = p384::ecdsa::SigningKey::from_pkcs8_der(der) {
            let verifying = *signing.verifying_key();
            return Ok(EcKey::P384 { signing: Some(signing), verifying });
        }
        let secret = p521::SecretKey::from_pkcs8_der(der)
            .map_err(|e| JwtError::Key(format!("Invalid EC private key: {e}")))?;
        let signing = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
            .map_err(|e| JwtError::Key(format!("Invalid EC private key: {e}")))?;
        let verifying = p521::ecdsa::VerifyingKey::from(&signing);
        Ok(EcKey::P521 { signing: Some(signing), verifying })
    }

    /// Parse an SPKI DER public key; the curve is taken from the key
    pub fn from_public_key_der(der: &[u8]) -> JwtResult<Self> {
        if let Ok(verifying) = p256::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Ok(EcKey::P256 { signing: None, verifying });
        }
        if let Ok(verifying) = p384::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Ok(EcKey::P384 { signing: None, verifying });
        }
        use p521::elliptic_curve::sec1::ToEncodedPoint;
        let public = p521::PublicKey::from_public_key_der(der)
            .map_err(|e| JwtError::Key(format!("Invalid EC public key: {e}")))?;
        let verifying =
            p521::ecdsa::VerifyingKey::from_sec1_bytes(public.to_encoded_point(false).as_bytes())
                .map_err(|e| JwtError::Key(format!("Invalid EC public key: {e}")))?;
        Ok(EcKey::P521 { signing: None, verifying })
    }

    /// Parse a SEC1 encoded public point on a known curve
    pub fn from_sec1_public(curve: EcCurve, bytes: &[u8]) -> JwtResult<Self> {
        let invalid = |e: p256::ecdsa::Error| {
            JwtError::Key(format!("Invalid {curve} public point: {e}"))
        };
        Ok(match curve {
            EcCurve::P256 => EcKey::P256 {
                signing: None,
                verifying: p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map_err(invalid)?,
            },
            EcCurve::P384 => EcKey::P384 {
                signing: None,
                verifying: p384::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map_err(invalid)?,
            },
            EcCurve::P521 => EcKey::P521 {
                signing: None,
                verifying: p521::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map_err(invalid)?,
            },
        })
    }

    /// The curve this key lives on
    pub fn curve(&self) -> EcCurve {
        match self {
            EcKey::P256 { .. } => EcCurve::P256,
            EcKey::P384 { .. } => EcCurve::P384,
            EcKey::P521 { .. } => EcCurve::P521,
        }
    }

    /// Whether this key can sign
    pub fn is_private(&self) -> bool {
        match self {
            EcKey::P256 { signing, .. } => signing.is_some(),
            EcKey::P384 { signing, .. } => signing.is_some(),
            EcKey::P521 { signing, .. } => signing.is_some(),
        }
    }

    /// A public-only copy of this key
    #[must_use]
    pub fn to_public(&self) -> Self {
        match self {
            EcKey::P256 { verifying, .. } => EcKey::P256 { signing: None, verifying: *verifying },
            EcKey::P384 { verifying, .. } => EcKey::P384 { signing: None, verifying: *verifying },
            EcKey::P521 { verifying, .. } => {
                EcKey::P521 { signing: None, verifying: verifying.clone() }
            }
        }
    }
}

impl fmt::Debug for EcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKey")
            .field("curve", &self.curve())
            .field("private", &self.is_private())
            .finish()
    }
}
