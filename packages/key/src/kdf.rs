//! Concat KDF (NIST SP 800-56A single-step KDF)
//!
//! Each round hashes
//!
//! ```text
//! be32(round) || key || be32(output_bits) || algorithm_id || be32(0) || be32(0) || label
//! ```
//!
//! where the two zero words stand in for the empty PartyUInfo and
//! PartyVInfo fields. Round hashes are concatenated and the result is
//! truncated to `output_bits / 8` bytes.

use crate::{KeyError, Result};
use digest::Digest;
use zeroize::Zeroizing;

/// Placeholder for the PartyUInfo / PartyVInfo context fields
const EMPTY_PARTY_INFO: [u8; 4] = [0; 4];

/// Derive `output_bits` bits of keying material from `key`
///
/// `algorithm_id` is the content-encryption algorithm name and `label`
/// separates the derived keys (`"Encryption"` / `"Integrity"`).
///
/// # Errors
/// Returns `KeyError::KeyDerivation` if `output_bits` is zero or not a
/// multiple of eight.
pub fn concat_kdf<D: Digest>(
    key: &[u8],
    output_bits: u32,
    algorithm_id: &str,
    label: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    if output_bits == 0 || output_bits % 8 != 0 {
        return Err(KeyError::key_derivation(
            "output length must be a non-zero multiple of 8 bits",
        ));
    }

    let output_len = (output_bits / 8) as usize;
    let digest_len = <D as Digest>::output_size();
    let rounds = output_len.div_ceil(digest_len);
    let rounds = u32::try_from(rounds)
        .map_err(|_| KeyError::key_derivation("too many derivation rounds"))?;

    let mut output = Zeroizing::new(Vec::with_capacity(rounds as usize * digest_len));
    for round in 1..=rounds {
        let mut hasher = D::new();
        hasher.update(round.to_be_bytes());
        hasher.update(key);
        hasher.update(output_bits.to_be_bytes());
        hasher.update(algorithm_id.as_bytes());
        hasher.update(EMPTY_PARTY_INFO);
        hasher.update(EMPTY_PARTY_INFO);
        hasher.update(label.as_bytes());
        output.extend_from_slice(&hasher.finalize());
    }
    output.truncate(output_len);

    tracing::trace!(output_bits, rounds, algorithm_id, label, "derived key");
    Ok(output)
}
