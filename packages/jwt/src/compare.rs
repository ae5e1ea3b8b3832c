//! Timing-safe byte comparison for signatures and authentication tags

use subtle::ConstantTimeEq;

/// Compare two byte strings without an early exit on the first mismatch.
///
/// Unequal lengths return `false` immediately; only the content comparison is
/// constant time.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
