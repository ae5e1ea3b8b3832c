//! A128CBC+HS256 and A256CBC+HS512: AES-CBC with an HMAC integrity value
//!
//! The CMK is split with the Concat KDF into an encryption key and an
//! integrity key. The integrity value is verified before any decryption.

use std::fmt;

use aes::{Aes128, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Sha256, Sha512};
use sigil_key::concat_kdf;
use zeroize::Zeroizing;

use super::alg::KeyManagement;
use super::{assemble, content_master_key, EncryptionAlgorithm, Encrypter, TokenParts};
use crate::compare::constant_time_eq;
use crate::crypto::hmac_sha2::{hmac_sign, ShaSize};
use crate::error::{JwtError, JwtResult};
use crate::header::Header;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const IV_LEN: usize = 16;
const ENCRYPTION_LABEL: &str = "Encryption";
const INTEGRITY_LABEL: &str = "Integrity";

/// AES-CBC + HMAC-SHA2 composite authenticated encryption
pub struct AesCbcHs {
    algorithm: EncryptionAlgorithm,
    sha: ShaSize,
    key_management: Box<dyn KeyManagement>,
}

struct DerivedKeys {
    encryption: Zeroizing<Vec<u8>>,
    integrity: Zeroizing<Vec<u8>>,
}

impl AesCbcHs {
    /// AES-128-CBC with HMAC-SHA-256
    pub fn a128cbc_hs256(alg: impl KeyManagement + 'static) -> Self {
        Self {
            algorithm: EncryptionAlgorithm::A128CbcHs256,
            sha: ShaSize::Sha256,
            key_management: Box::new(alg),
        }
    }

    /// AES-256-CBC with HMAC-SHA-512
    pub fn a256cbc_hs512(alg: impl KeyManagement + 'static) -> Self {
        Self {
            algorithm: EncryptionAlgorithm::A256CbcHs512,
            sha: ShaSize::Sha512,
            key_management: Box::new(alg),
        }
    }

    fn derive_keys(&self, cmk: &[u8]) -> JwtResult<DerivedKeys> {
        let id = self.algorithm.name();
        let aes_bits = self.algorithm.aes_bits();
        let mac_bits = self.sha.bits();
        let keys = match self.sha {
            ShaSize::Sha256 => DerivedKeys {
                encryption: concat_kdf::<Sha256>(cmk, aes_bits, id, ENCRYPTION_LABEL)?,
                integrity: concat_kdf::<Sha256>(cmk, mac_bits, id, INTEGRITY_LABEL)?,
            },
            ShaSize::Sha512 => DerivedKeys {
                encryption: concat_kdf::<Sha512>(cmk, aes_bits, id, ENCRYPTION_LABEL)?,
                integrity: concat_kdf::<Sha512>(cmk, mac_bits, id, INTEGRITY_LABEL)?,
            },
            ShaSize::Sha384 => {
                return Err(JwtError::Key(format!(
                    "{} has no SHA-384 key derivation",
                    self.algorithm
                )))
            }
        };
        Ok(keys)
    }

    /// HMAC over `aad || iv || ciphertext || be64(bit_len(aad))`, truncated to half
    fn integrity_value(
        &self,
        integrity_key: &[u8],
        aad: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> JwtResult<Vec<u8>> {
        let aad_bits = (aad.len() as u64 * 8).to_be_bytes();
        let mut mac = hmac_sign(self.sha, integrity_key, &[aad, iv, ciphertext, &aad_bits[..]])?;
        mac.truncate(self.sha.len() / 2);
        Ok(mac)
    }

    fn cbc_encrypt(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> JwtResult<Vec<u8>> {
        let ciphertext = match self.algorithm.aes_bits() {
            128 => Aes128CbcEnc::new_from_slices(key, iv)
                .map_err(|_| JwtError::key("invalid AES-128-CBC key or IV length"))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            _ => Aes256CbcEnc::new_from_slices(key, iv)
                .map_err(|_| JwtError::key("invalid AES-256-CBC key or IV length"))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        };
        Ok(ciphertext)
    }

    fn cbc_decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> JwtResult<Vec<u8>> {
        let invalid = |_| JwtError::invalid_token("cannot decrypt the payload");
        match self.algorithm.aes_bits() {
            128 => Aes128CbcDec::new_from_slices(key, iv)
                .map_err(|_| JwtError::invalid_token("invalid AES-CBC IV length"))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(invalid),
            _ => Aes256CbcDec::new_from_slices(key, iv)
                .map_err(|_| JwtError::invalid_token("invalid AES-CBC IV length"))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(invalid),
        }
    }
}

impl Encrypter for AesCbcHs {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn alg(&self) -> &dyn KeyManagement {
        self.key_management.as_ref()
    }

    fn encrypt(&self, header: &Header, payload: &[u8]) -> JwtResult<String> {
        let cmk = content_master_key(self.alg(), self.sha.len())?;
        let encrypted_key = self.key_management.encrypt_cmk(&cmk)?;
        let keys = self.derive_keys(&cmk)?;
        let iv = sigil_key::entropy::generate_iv(IV_LEN);
        let ciphertext = self.cbc_encrypt(&keys.encryption, &iv, payload)?;

        let aad = format!("{}.{}", header.encode()?, crate::codec::encode(&encrypted_key));
        let tag = self.integrity_value(&keys.integrity, aad.as_bytes(), &iv, &ciphertext)?;
        Ok(assemble(&aad, &iv, &ciphertext, &tag))
    }

    fn decrypt(&self, parts: &TokenParts<'_>) -> JwtResult<Vec<u8>> {
        let decoded = parts.decode()?;
        let cmk = self.key_management.decrypt_cmk(&decoded.encrypted_key)?;
        if cmk.len() != self.sha.len() {
            return Err(JwtError::invalid_token("the content master key has the wrong length"));
        }
        let keys = self.derive_keys(&cmk)?;

        let aad = parts.aad();
        let expected =
            self.integrity_value(&keys.integrity, aad.as_bytes(), &decoded.iv, &decoded.ciphertext)?;
        if !constant_time_eq(&expected, &decoded.tag) {
            tracing::warn!(enc = self.name(), "integrity value mismatch");
            return Err(JwtError::invalid_token("invalid integrity value"));
        }
        if decoded.iv.len() != IV_LEN {
            return Err(JwtError::invalid_token("invalid AES-CBC IV length"));
        }
        self.cbc_decrypt(&keys.encryption, &decoded.iv, &decoded.ciphertext)
    }
}

impl fmt::Debug for AesCbcHs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesCbcHs")
            .field("algorithm", &self.algorithm)
            .field("alg", &self.key_management.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enc::alg::Direct;

    #[test]
    fn derivation_digest_follows_the_mac() {
        let cbc = AesCbcHs::a256cbc_hs512(Direct::new([7u8; 64]));
        let keys = cbc.derive_keys(&[7u8; 64]).expect("derive");
        assert_eq!(keys.encryption.len(), 32);
        assert_eq!(keys.integrity.len(), 64);
        let expected = concat_kdf::<Sha512>(&[7u8; 64], 512, "A256CBC+HS512", INTEGRITY_LABEL)
            .expect("kdf");
        assert_eq!(*keys.integrity, *expected);
    }

    #[test]
    fn unpaired_digest_is_refused() {
        let cbc = AesCbcHs {
            algorithm: EncryptionAlgorithm::A256CbcHs512,
            sha: ShaSize::Sha384,
            key_management: Box::new(Direct::new([7u8; 48])),
        };
        assert!(matches!(cbc.derive_keys(&[7u8; 48]), Err(JwtError::Key(_))));
    }
}
