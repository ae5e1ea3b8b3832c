//! Content-encryption family: AES-CBC + HMAC and AES-GCM

pub mod alg;
mod aescbc_hs;
mod aesgcm;

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

pub use self::aescbc_hs::AesCbcHs;
pub use self::aesgcm::AesGcm;

use self::alg::KeyManagement;
use crate::codec;
use crate::error::{JwtError, JwtResult};
use crate::header::Header;

/// Encrypts payloads into compact JWE tokens and back.
pub trait Encrypter: Send + Sync {
    /// Header `enc` value
    fn name(&self) -> &'static str;

    /// The key-management algorithm carrying the content master key
    fn alg(&self) -> &dyn KeyManagement;

    /// Encrypt `payload` under `header`, returning the full five-segment token.
    ///
    /// The header is serialized as given; callers set `alg` and `enc`.
    fn encrypt(&self, header: &Header, payload: &[u8]) -> JwtResult<String>;

    /// Authenticate and decrypt the five parts of a token
    fn decrypt(&self, parts: &TokenParts<'_>) -> JwtResult<Vec<u8>>;

    /// Authenticate and decrypt a full compact token
    fn decrypt_token(&self, token: &str) -> JwtResult<Vec<u8>> {
        self.decrypt(&TokenParts::parse(token)?)
    }
}

impl<T: Encrypter + ?Sized> Encrypter for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn alg(&self) -> &dyn KeyManagement {
        (**self).alg()
    }

    fn encrypt(&self, header: &Header, payload: &[u8]) -> JwtResult<String> {
        (**self).encrypt(header, payload)
    }

    fn decrypt(&self, parts: &TokenParts<'_>) -> JwtResult<Vec<u8>> {
        (**self).decrypt(parts)
    }
}

impl<T: Encrypter + ?Sized> Encrypter for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn alg(&self) -> &dyn KeyManagement {
        (**self).alg()
    }

    fn encrypt(&self, header: &Header, payload: &[u8]) -> JwtResult<String> {
        (**self).encrypt(header, payload)
    }

    fn decrypt(&self, parts: &TokenParts<'_>) -> JwtResult<Vec<u8>> {
        (**self).decrypt(parts)
    }
}

/// Every `enc` value the content-encryption family implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionAlgorithm {
    /// AES-128-CBC with HMAC-SHA-256
    A128CbcHs256,
    /// AES-256-CBC with HMAC-SHA-512
    A256CbcHs512,
    /// AES-128-GCM
    A128Gcm,
    /// AES-256-GCM
    A256Gcm,
}

impl EncryptionAlgorithm {
    /// All implemented algorithms
    pub const ALL: [EncryptionAlgorithm; 4] = [
        EncryptionAlgorithm::A128CbcHs256,
        EncryptionAlgorithm::A256CbcHs512,
        EncryptionAlgorithm::A128Gcm,
        EncryptionAlgorithm::A256Gcm,
    ];

    /// Header `enc` value
    pub fn name(self) -> &'static str {
        match self {
            EncryptionAlgorithm::A128CbcHs256 => "A128CBC+HS256",
            EncryptionAlgorithm::A256CbcHs512 => "A256CBC+HS512",
            EncryptionAlgorithm::A128Gcm => "A128GCM",
            EncryptionAlgorithm::A256Gcm => "A256GCM",
        }
    }

    /// Look up an `enc` value; names are case-sensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|enc| enc.name() == name)
    }

    /// AES key length in bits
    pub fn aes_bits(self) -> u32 {
        match self {
            EncryptionAlgorithm::A128CbcHs256 | EncryptionAlgorithm::A128Gcm => 128,
            EncryptionAlgorithm::A256CbcHs512 | EncryptionAlgorithm::A256Gcm => 256,
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The five base64url segments of a compact JWE token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    /// Protected header
    pub header: &'a str,
    /// Encrypted content master key
    pub encrypted_key: &'a str,
    /// Initialization vector
    pub iv: &'a str,
    /// Ciphertext
    pub ciphertext: &'a str,
    /// Integrity value or authentication tag
    pub tag: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split a compact token; anything but five segments is an invalid token
    pub fn parse(token: &'a str) -> JwtResult<Self> {
        let segments: Vec<&'a str> = token.split('.').collect();
        Self::from_segments(&segments)
    }

    /// Build from already split segments
    pub fn from_segments(segments: &[&'a str]) -> JwtResult<Self> {
        match *segments {
            [header, encrypted_key, iv, ciphertext, tag] => Ok(Self {
                header,
                encrypted_key,
                iv,
                ciphertext,
                tag,
            }),
            _ => Err(JwtError::InvalidToken(format!(
                "an encrypted token has 5 segments, got {}",
                segments.len()
            ))),
        }
    }

    /// Additional authenticated data: `header "." encrypted_key`
    pub(crate) fn aad(&self) -> String {
        format!("{}.{}", self.header, self.encrypted_key)
    }

    pub(crate) fn decode(&self) -> JwtResult<DecodedParts> {
        Ok(DecodedParts {
            encrypted_key: codec::decode(self.encrypted_key)?,
            iv: codec::decode(self.iv)?,
            ciphertext: codec::decode(self.ciphertext)?,
            tag: codec::decode(self.tag)?,
        })
    }
}

pub(crate) struct DecodedParts {
    pub(crate) encrypted_key: Vec<u8>,
    pub(crate) iv: Vec<u8>,
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) tag: Vec<u8>,
}

/// Obtain the CMK: the pre-shared key when there is one, else fresh random bytes
pub(crate) fn content_master_key(
    alg: &dyn KeyManagement,
    len: usize,
) -> JwtResult<Zeroizing<Vec<u8>>> {
    match alg.preshared_key() {
        Some(key) if key.len() == len => Ok(Zeroizing::new(key.to_vec())),
        Some(key) => Err(JwtError::Key(format!(
            "the content master key must be {len} bytes, got {}",
            key.len()
        ))),
        None => Ok(sigil_key::entropy::generate_key(len)),
    }
}

/// Join the five segments of an encrypted token
pub(crate) fn assemble(aad: &str, iv: &[u8], ciphertext: &[u8], tag: &[u8]) -> String {
    format!(
        "{aad}.{}.{}.{}",
        codec::encode(iv),
        codec::encode(ciphertext),
        codec::encode(tag)
    )
}
