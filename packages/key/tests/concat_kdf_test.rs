//! Concat KDF known answers and determinism

use hex_literal::hex;
use proptest::prelude::*;
use sha2::{Sha256, Sha512};
use sigil_key::{KeyError, concat_kdf};

const CMK: [u8; 32] = hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");

#[test]
fn test_encryption_key_known_answer() {
    let key = concat_kdf::<Sha256>(&CMK, 128, "A128CBC+HS256", "Encryption")
        .expect("derivation should succeed");
    assert_eq!(key.as_slice(), hex!("1b5bced48406672a44f894a92d6b2622"));
}

#[test]
fn test_integrity_key_known_answer() {
    let key = concat_kdf::<Sha256>(&CMK, 256, "A128CBC+HS256", "Integrity")
        .expect("derivation should succeed");
    assert_eq!(
        key.as_slice(),
        hex!("a1ae0d9ba9f36995fc82b1e025090db1ec4cae9511d519092b9c0d7874dd7406")
    );
}

#[test]
fn test_multi_round_known_answer() {
    // 512 bits from SHA-256 needs two rounds
    let key = concat_kdf::<Sha256>(&CMK, 512, "A128CBC+HS256", "Integrity")
        .expect("derivation should succeed");
    assert_eq!(
        key.as_slice(),
        hex!(
            "bc714187d6b6147e1dbdff675950a5c367cfeafc89cadfc997b36d9b9ca51691"
            "d1009cbc806924458d4395db1ddece3c6305de9f9f5af8b8e9507f88b75bbbc9"
        )
    );
}

#[test]
fn test_label_separates_keys() {
    let enc = concat_kdf::<Sha512>(&CMK, 256, "A256CBC+HS512", "Encryption")
        .expect("derivation should succeed");
    let int = concat_kdf::<Sha512>(&CMK, 256, "A256CBC+HS512", "Integrity")
        .expect("derivation should succeed");
    assert_ne!(*enc, *int);
}

#[test]
fn test_algorithm_id_separates_keys() {
    let a = concat_kdf::<Sha256>(&CMK, 128, "A128CBC+HS256", "Encryption")
        .expect("derivation should succeed");
    let b = concat_kdf::<Sha256>(&CMK, 128, "A256CBC+HS512", "Encryption")
        .expect("derivation should succeed");
    assert_ne!(*a, *b);
}

#[test]
fn test_output_length_follows_bits() {
    for bits in [8u32, 128, 256, 384, 520, 1024] {
        let key = concat_kdf::<Sha512>(&CMK, bits, "A256CBC+HS512", "Integrity")
            .expect("derivation should succeed");
        assert_eq!(key.len(), (bits / 8) as usize);
    }
}

#[test]
fn test_invalid_lengths_rejected() {
    assert!(matches!(
        concat_kdf::<Sha256>(&CMK, 0, "A128CBC+HS256", "Encryption"),
        Err(KeyError::KeyDerivation(_))
    ));
    assert!(matches!(
        concat_kdf::<Sha256>(&CMK, 100, "A128CBC+HS256", "Encryption"),
        Err(KeyError::KeyDerivation(_))
    ));
}

proptest! {
    #[test]
    fn prop_derivation_is_deterministic(
        key in proptest::collection::vec(any::<u8>(), 0..96),
        bytes in 1u32..=96,
        label in "[A-Za-z]{1,16}",
    ) {
        let first = concat_kdf::<Sha256>(&key, bytes * 8, "A128GCM", &label)
            .expect("derivation should succeed");
        let second = concat_kdf::<Sha256>(&key, bytes * 8, "A128GCM", &label)
            .expect("derivation should succeed");
        prop_assert_eq!(first.as_slice(), second.as_slice());
    }
}
