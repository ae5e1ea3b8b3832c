//! Fixtures shared by the integration tests

#![allow(dead_code)]

use once_cell::sync::Lazy;
use sigil_jwt::codec;
use sigil_jwt::keys::RsaKey;

/// One RSA-2048 key per test binary; generation is slow
pub static RSA_KEY: Lazy<RsaKey> =
    Lazy::new(|| RsaKey::generate(2048).expect("generate RSA-2048 key"));

/// Flip one bit in the middle of segment `index`; an empty segment gains a byte
pub fn tamper_segment(token: &str, index: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(String::from).collect();
    let mut bytes = codec::decode(&segments[index]).expect("decode segment");
    if bytes.is_empty() {
        bytes.push(0);
    } else {
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0x01;
    }
    segments[index] = codec::encode(bytes);
    segments.join(".")
}

/// Replace segment `index` with the encoding of `bytes`
pub fn replace_segment(token: &str, index: usize, bytes: &[u8]) -> String {
    let mut segments: Vec<String> = token.split('.').map(String::from).collect();
    segments[index] = codec::encode(bytes);
    segments.join(".")
}

/// Payloads of zero bytes, one byte and several cipher blocks
pub fn payloads() -> Vec<Vec<u8>> {
    vec![Vec::new(), b"x".to_vec(), b"a payload that spans several AES blocks".repeat(3)]
}
