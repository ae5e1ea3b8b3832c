//! RSA1_5 and RSA-OAEP key wrapping

use std::fmt;

use rand_core::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use zeroize::Zeroizing;

use super::{KeyManagement, KeyManagementAlgorithm};
use crate::error::{JwtError, JwtResult};
use crate::keys::RsaKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Padding {
    Pkcs1v15,
    OaepSha1,
}

struct RsaWrap {
    algorithm: KeyManagementAlgorithm,
    padding: Padding,
    private: Option<Box<RsaPrivateKey>>,
    public: RsaPublicKey,
}

impl RsaWrap {
    fn new(algorithm: KeyManagementAlgorithm, padding: Padding, key: RsaKey) -> JwtResult<Self> {
        key.check_size()?;
        let public = key.public_key();
        let private = match key {
            RsaKey::Private(private) => Some(private),
            RsaKey::Public(_) => None,
        };
        Ok(Self {
            algorithm,
            padding,
            private,
            public,
        })
    }

    fn encrypt(&self, cmk: &[u8]) -> JwtResult<Vec<u8>> {
        let wrapped = match self.padding {
            Padding::Pkcs1v15 => self.public.encrypt(&mut OsRng, Pkcs1v15Encrypt, cmk),
            Padding::OaepSha1 => self.public.encrypt(&mut OsRng, Oaep::new::<Sha1>(), cmk),
        };
        wrapped.map_err(|e| JwtError::Key(format!("{} key wrapping failed: {e}", self.algorithm)))
    }

    fn decrypt(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
        let private = self
            .private
            .as_ref()
            .ok_or_else(|| JwtError::key("A private key is required to unwrap the content key"))?;
        let unwrapped = match self.padding {
            Padding::Pkcs1v15 => private.decrypt(Pkcs1v15Encrypt, encrypted_cmk),
            Padding::OaepSha1 => private.decrypt(Oaep::new::<Sha1>(), encrypted_cmk),
        };
        unwrapped
            .map(Zeroizing::new)
            .map_err(|_| JwtError::invalid_token("cannot decrypt the content master key"))
    }
}

/// RSAES-PKCS1-v1_5 key wrapping
#[allow(non_camel_case_types)]
pub struct Rsa1_5(RsaWrap);

impl Rsa1_5 {
    /// A public key wraps; a private key wraps and unwraps
    pub fn new(key: impl Into<RsaKey>) -> JwtResult<Self> {
        RsaWrap::new(KeyManagementAlgorithm::Rsa1_5, Padding::Pkcs1v15, key.into()).map(Self)
    }
}

impl KeyManagement for Rsa1_5 {
    fn name(&self) -> &'static str {
        self.0.algorithm.name()
    }

    fn encrypt_cmk(&self, cmk: &[u8]) -> JwtResult<Vec<u8>> {
        self.0.encrypt(cmk)
    }

    fn decrypt_cmk(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
        self.0.decrypt(encrypted_cmk)
    }
}

/// RSAES-OAEP key wrapping with SHA-1 and MGF1-SHA-1
pub struct RsaOaep(RsaWrap);

impl RsaOaep {
    /// A public key wraps; a private key wraps and unwraps
    pub fn new(key: impl Into<RsaKey>) -> JwtResult<Self> {
        RsaWrap::new(KeyManagementAlgorithm::RsaOaep, Padding::OaepSha1, key.into()).map(Self)
    }
}

impl KeyManagement for RsaOaep {
    fn name(&self) -> &'static str {
        self.0.algorithm.name()
    }

    fn encrypt_cmk(&self, cmk: &[u8]) -> JwtResult<Vec<u8>> {
        self.0.encrypt(cmk)
    }

    fn decrypt_cmk(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
        self.0.decrypt(encrypted_cmk)
    }
}

impl fmt::Debug for RsaWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaWrap")
            .field("algorithm", &self.algorithm)
            .field("padding", &self.padding)
            .field("can_unwrap", &self.private.is_some())
            .finish()
    }
}

impl fmt::Debug for Rsa1_5 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rsa1_5").field(&self.0).finish()
    }
}

impl fmt::Debug for RsaOaep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RsaOaep").field(&self.0).finish()
    }
}
