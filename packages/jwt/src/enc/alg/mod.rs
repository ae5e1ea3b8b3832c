//! Key-management family: how the content master key reaches the recipient

mod direct;
mod rsa;

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

pub use self::direct::Direct;
pub use self::rsa::{Rsa1_5, RsaOaep};

use crate::error::JwtResult;

/// Wraps and unwraps the content master key (CMK).
///
/// Unwrapping failures caused by the token are reported as invalid tokens
/// with no detail from the underlying primitive.
pub trait KeyManagement: Send + Sync {
    /// Header `alg` value
    fn name(&self) -> &'static str;

    /// Produce the encrypted key segment for `cmk`
    fn encrypt_cmk(&self, cmk: &[u8]) -> JwtResult<Vec<u8>>;

    /// Recover the CMK from the encrypted key segment
    fn decrypt_cmk(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>>;

    /// The pre-shared CMK, for algorithms that never transmit one
    fn preshared_key(&self) -> Option<&[u8]> {
        None
    }
}

impl<T: KeyManagement + ?Sized> KeyManagement for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encrypt_cmk(&self, cmk: &[u8]) -> JwtResult<Vec<u8>> {
        (**self).encrypt_cmk(cmk)
    }

    fn decrypt_cmk(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
        (**self).decrypt_cmk(encrypted_cmk)
    }

    fn preshared_key(&self) -> Option<&[u8]> {
        (**self).preshared_key()
    }
}

impl<T: KeyManagement + ?Sized> KeyManagement for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encrypt_cmk(&self, cmk: &[u8]) -> JwtResult<Vec<u8>> {
        (**self).encrypt_cmk(cmk)
    }

    fn decrypt_cmk(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
        (**self).decrypt_cmk(encrypted_cmk)
    }

    fn preshared_key(&self) -> Option<&[u8]> {
        (**self).preshared_key()
    }
}

/// Every `alg` value the key-management family implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyManagementAlgorithm {
    /// Pre-shared CMK, nothing transmitted
    Direct,
    /// RSAES-PKCS1-v1_5
    Rsa1_5,
    /// RSAES-OAEP with SHA-1 and MGF1-SHA-1
    RsaOaep,
}

impl KeyManagementAlgorithm {
    /// All implemented algorithms
    pub const ALL: [KeyManagementAlgorithm; 3] = [
        KeyManagementAlgorithm::Direct,
        KeyManagementAlgorithm::Rsa1_5,
        KeyManagementAlgorithm::RsaOaep,
    ];

    /// Header `alg` value
    pub fn name(self) -> &'static str {
        match self {
            KeyManagementAlgorithm::Direct => "dir",
            KeyManagementAlgorithm::Rsa1_5 => "RSA1_5",
            KeyManagementAlgorithm::RsaOaep => "RSA-OAEP",
        }
    }

    /// Look up an `alg` value; names are case-sensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.name() == name)
    }
}

impl fmt::Display for KeyManagementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
