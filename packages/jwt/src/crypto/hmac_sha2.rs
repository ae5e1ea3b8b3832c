//! HMAC and digest operations over the SHA-2 family

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::error::{JwtError, JwtResult};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// SHA-2 output size selecting the digest behind HMAC, RSA and CBC-HS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShaSize {
    Sha256,
    Sha384,
    Sha512,
}

impl ShaSize {
    /// Digest output length in bits
    pub(crate) fn bits(self) -> u32 {
        match self {
            ShaSize::Sha256 => 256,
            ShaSize::Sha384 => 384,
            ShaSize::Sha512 => 512,
        }
    }

    /// Digest output length in bytes
    pub(crate) fn len(self) -> usize {
        self.bits() as usize / 8
    }
}

/// HMAC over the concatenation of `parts`
pub(crate) fn hmac_sign(sha: ShaSize, key: &[u8], parts: &[&[u8]]) -> JwtResult<Vec<u8>> {
    match sha {
        ShaSize::Sha256 => Ok(finish(HmacSha256::new_from_slice(key).map_err(invalid_key)?, parts)),
        ShaSize::Sha384 => Ok(finish(HmacSha384::new_from_slice(key).map_err(invalid_key)?, parts)),
        ShaSize::Sha512 => Ok(finish(HmacSha512::new_from_slice(key).map_err(invalid_key)?, parts)),
    }
}

fn finish<M: Mac>(mut mac: M, parts: &[&[u8]]) -> Vec<u8> {
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

fn invalid_key(_: hmac::digest::InvalidLength) -> JwtError {
    JwtError::key("Invalid HMAC key")
}

/// Plain SHA-2 digest of `data`
pub(crate) fn digest(sha: ShaSize, data: &[u8]) -> Vec<u8> {
    use sha2::Digest;
    match sha {
        ShaSize::Sha256 => Sha256::digest(data).to_vec(),
        ShaSize::Sha384 => Sha384::digest(data).to_vec(),
        ShaSize::Sha512 => Sha512::digest(data).to_vec(),
    }
}
