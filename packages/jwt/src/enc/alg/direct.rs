use std::fmt;

use zeroize::Zeroizing;

use super::{KeyManagement, KeyManagementAlgorithm};
use crate::error::{JwtError, JwtResult};

/// Direct use of a pre-shared content master key.
///
/// The key is never transmitted: the encrypted key segment is empty.
pub struct Direct {
    key: Zeroizing<Vec<u8>>,
}

impl Direct {
    /// Share `key` as the content master key
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: Zeroizing::new(key.as_ref().to_vec()),
        }
    }
}

impl KeyManagement for Direct {
    fn name(&self) -> &'static str {
        KeyManagementAlgorithm::Direct.name()
    }

    fn encrypt_cmk(&self, _cmk: &[u8]) -> JwtResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn decrypt_cmk(&self, encrypted_cmk: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
        if !encrypted_cmk.is_empty() {
            return Err(JwtError::invalid_token(
                "direct key agreement must not carry an encrypted key",
            ));
        }
        Ok(self.key.clone())
    }

    fn preshared_key(&self) -> Option<&[u8]> {
        Some(&self.key)
    }
}

impl fmt::Debug for Direct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Direct").field("key_len", &self.key.len()).finish()
    }
}
