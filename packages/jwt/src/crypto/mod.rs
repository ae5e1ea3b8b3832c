//! Primitive helpers shared by the signature and encryption families

pub(crate) mod ec_signature;
pub(crate) mod hmac_sha2;
