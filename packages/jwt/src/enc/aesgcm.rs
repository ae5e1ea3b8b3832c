//! A128GCM and A256GCM

use std::fmt;

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, KeyInit, Nonce};

use super::alg::KeyManagement;
use super::{assemble, content_master_key, EncryptionAlgorithm, Encrypter, TokenParts};
use crate::error::{JwtError, JwtResult};
use crate::header::Header;

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-GCM authenticated encryption.
///
/// The additional authenticated data is `header "." encrypted_key`, the same
/// string the CBC family authenticates.
pub struct AesGcm {
    algorithm: EncryptionAlgorithm,
    key_management: Box<dyn KeyManagement>,
}

impl AesGcm {
    /// AES-128-GCM
    pub fn a128gcm(alg: impl KeyManagement + 'static) -> Self {
        Self {
            algorithm: EncryptionAlgorithm::A128Gcm,
            key_management: Box::new(alg),
        }
    }

    /// AES-256-GCM
    pub fn a256gcm(alg: impl KeyManagement + 'static) -> Self {
        Self {
            algorithm: EncryptionAlgorithm::A256Gcm,
            key_management: Box::new(alg),
        }
    }

    fn key_len(&self) -> usize {
        self.algorithm.aes_bits() as usize / 8
    }

    /// Returns ciphertext with the tag appended
    fn seal(&self, key: &[u8], iv: &[u8], aad: &[u8], msg: &[u8]) -> JwtResult<Vec<u8>> {
        let nonce = Nonce::from_slice(iv);
        let payload = Payload { msg, aad };
        let sealed = match self.algorithm {
            EncryptionAlgorithm::A128Gcm => Aes128Gcm::new_from_slice(key)
                .map_err(|_| JwtError::key("invalid AES-128-GCM key length"))?
                .encrypt(nonce, payload),
            _ => Aes256Gcm::new_from_slice(key)
                .map_err(|_| JwtError::key("invalid AES-256-GCM key length"))?
                .encrypt(nonce, payload),
        };
        sealed.map_err(|_| JwtError::key("AES-GCM encryption failed"))
    }

    /// Expects ciphertext with the tag appended
    fn open(&self, key: &[u8], iv: &[u8], aad: &[u8], msg: &[u8]) -> JwtResult<Vec<u8>> {
        let nonce = Nonce::from_slice(iv);
        let payload = Payload { msg, aad };
        let wrong_key = |_| JwtError::invalid_token("the content master key has the wrong length");
        let opened = match self.algorithm {
            EncryptionAlgorithm::A128Gcm => {
                Aes128Gcm::new_from_slice(key).map_err(wrong_key)?.decrypt(nonce, payload)
            }
            _ => Aes256Gcm::new_from_slice(key).map_err(wrong_key)?.decrypt(nonce, payload),
        };
        opened.map_err(|_| {
            tracing::warn!(enc = self.algorithm.name(), "authentication tag mismatch");
            JwtError::invalid_token("invalid authentication tag")
        })
    }
}

impl Encrypter for AesGcm {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn alg(&self) -> &dyn KeyManagement {
        self.key_management.as_ref()
    }

    fn encrypt(&self, header: &Header, payload: &[u8]) -> JwtResult<String> {
        let cmk = content_master_key(self.alg(), self.key_len())?;
        let encrypted_key = self.key_management.encrypt_cmk(&cmk)?;
        let iv = sigil_key::entropy::generate_iv(IV_LEN);

        let aad = format!("{}.{}", header.encode()?, crate::codec::encode(&encrypted_key));
        let mut ciphertext = self.seal(&cmk, &iv, aad.as_bytes(), payload)?;
        let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);
        Ok(assemble(&aad, &iv, &ciphertext, &tag))
    }

    fn decrypt(&self, parts: &TokenParts<'_>) -> JwtResult<Vec<u8>> {
        let decoded = parts.decode()?;
        if decoded.iv.len() != IV_LEN {
            return Err(JwtError::invalid_token("invalid AES-GCM IV length"));
        }
        if decoded.tag.len() != TAG_LEN {
            return Err(JwtError::invalid_token("invalid AES-GCM tag length"));
        }
        let cmk = self.key_management.decrypt_cmk(&decoded.encrypted_key)?;

        let mut sealed = decoded.ciphertext;
        sealed.extend_from_slice(&decoded.tag);
        self.open(&cmk, &decoded.iv, parts.aad().as_bytes(), &sealed)
    }
}

impl fmt::Debug for AesGcm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcm")
            .field("algorithm", &self.algorithm)
            .field("alg", &self.key_management.name())
            .finish()
    }
}
