//! CSPRNG-backed key material
//!
//! Content master keys and IVs are drawn from the thread-local CSPRNG.
//! Key buffers are wrapped in [`Zeroizing`] so they are wiped on drop.

use rand::RngCore;
use zeroize::Zeroizing;

/// Generate `len` cryptographically secure random bytes for use as key
/// material
#[must_use]
pub fn generate_key(len: usize) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a random IV of `len` bytes
///
/// IVs are public values and are not zeroized.
#[must_use]
pub fn generate_iv(len: usize) -> Vec<u8> {
    let mut iv = vec![0u8; len];
    rand::rng().fill_bytes(&mut iv);
    iv
}
