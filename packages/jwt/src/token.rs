//! Token engine: compact serialization, dispatch and nesting.
//!
//! Decoding is an explicit loop. Each pass parses one layer, asks the
//! resolver for a handler, verifies or decrypts, and either follows a nested
//! token (`cty: "JWT"`) or finishes with the payload. The number of layers
//! followed is bounded by [`ValidationOptions::max_nesting_depth`].

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use sigil_compression::{deflate, DEFLATE_ZIP_ID};

use crate::claims;
use crate::codec;
use crate::enc::alg::KeyManagementAlgorithm;
use crate::enc::{EncryptionAlgorithm, Encrypter, TokenParts};
use crate::error::{JwtError, JwtResult};
use crate::header::{Header, ALG, ENC, ZIP};
use crate::sig::{self, SignatureAlgorithm, Signer};
use crate::types::DecodedToken;
use crate::validation::ValidationOptions;

/// Handler chosen by a resolver for one token layer
pub enum KeyResolution {
    /// Verifies a signed or unsecured token
    Verifier(Box<dyn Signer>),
    /// Decrypts an encrypted token
    Decrypter(Box<dyn Encrypter>),
}

impl KeyResolution {
    /// Resolve to a verifier
    pub fn verifier(signer: impl Signer + 'static) -> Self {
        KeyResolution::Verifier(Box::new(signer))
    }

    /// Resolve to a decrypter
    pub fn decrypter(encrypter: impl Encrypter + 'static) -> Self {
        KeyResolution::Decrypter(Box::new(encrypter))
    }
}

impl fmt::Debug for KeyResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyResolution::Verifier(signer) => f.debug_tuple("Verifier").field(&signer.name()).finish(),
            KeyResolution::Decrypter(encrypter) => {
                f.debug_tuple("Decrypter").field(&encrypter.name()).finish()
            }
        }
    }
}

/// Compact serialization shapes, told apart by segment count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    /// Two segments: header and payload
    Unsigned,
    /// Three segments: header, payload and signature
    Signed,
    /// Five segments: header, encrypted key, IV, ciphertext and tag
    Encrypted,
}

impl TokenShape {
    /// Shape for a segment count; any other count is an invalid token
    pub fn from_segment_count(count: usize) -> JwtResult<Self> {
        match count {
            2 => Ok(TokenShape::Unsigned),
            3 => Ok(TokenShape::Signed),
            5 => Ok(TokenShape::Encrypted),
            n => Err(JwtError::InvalidToken(format!(
                "a token has 2, 3 or 5 segments, got {n}"
            ))),
        }
    }
}

/// Sign `payload` into a compact JWS.
///
/// `alg` is taken from the signer and omitted for `none`; the signature
/// segment is empty for `none`. Caller fields may not set `enc` or `zip`.
pub fn encode_token(
    payload: &[u8],
    signer: &dyn Signer,
    header_fields: Option<&Header>,
) -> JwtResult<String> {
    let mut header = header_fields.cloned().unwrap_or_default();
    header.check_reserved()?;
    if header.contains_key(ENC) {
        return Err(JwtError::invalid_token(
            "the enc header parameter is only valid on encrypted tokens",
        ));
    }
    if header.contains_key(ZIP) {
        return Err(JwtError::invalid_token(
            "compression is only supported on encrypted tokens",
        ));
    }
    if signer.name() == SignatureAlgorithm::None.name() {
        header.remove(ALG);
    } else {
        header.insert(ALG, signer.name());
    }

    let secured_input = format!("{}.{}", header.encode()?, codec::encode(payload));
    let signature = signer.sign(secured_input.as_bytes())?;
    tracing::debug!(alg = signer.name(), "encoded signed token");
    Ok(format!("{secured_input}.{}", codec::encode(signature)))
}

/// JSON-encode `claims` and sign them into a compact JWS
pub fn encode_claims<C: Serialize + ?Sized>(
    claims: &C,
    signer: &dyn Signer,
    header_fields: Option<&Header>,
) -> JwtResult<String> {
    let payload = serde_json::to_vec(claims)
        .map_err(|e| JwtError::Claim(format!("claims are not serializable: {e}")))?;
    encode_token(&payload, signer, header_fields)
}

/// Encrypt `payload` into a compact JWE.
///
/// `alg` and `enc` are taken from the encrypter and override caller fields.
/// A `zip` field of `"DEF"` compresses the payload before encryption.
pub fn encrypt_token(
    payload: &[u8],
    encrypter: &dyn Encrypter,
    header_fields: Option<&Header>,
) -> JwtResult<String> {
    let mut header = header_fields.cloned().unwrap_or_default();
    header.check_reserved()?;
    header.insert(ALG, encrypter.alg().name());
    header.insert(ENC, encrypter.name());

    let payload = match header.zip() {
        None => Cow::Borrowed(payload),
        Some(DEFLATE_ZIP_ID) => Cow::Owned(deflate::compress(payload)?),
        Some(other) => {
            return Err(JwtError::InvalidToken(format!(
                "unsupported compression algorithm {other}"
            )))
        }
    };
    let token = encrypter.encrypt(&header, &payload)?;
    tracing::debug!(
        alg = encrypter.alg().name(),
        enc = encrypter.name(),
        "encoded encrypted token"
    );
    Ok(token)
}

/// JSON-encode `claims` and encrypt them into a compact JWE
pub fn encrypt_claims<C: Serialize + ?Sized>(
    claims: &C,
    encrypter: &dyn Encrypter,
    header_fields: Option<&Header>,
) -> JwtResult<String> {
    let payload = serde_json::to_vec(claims)
        .map_err(|e| JwtError::Claim(format!("claims are not serializable: {e}")))?;
    encrypt_token(&payload, encrypter, header_fields)
}

/// Parse the header of a 2, 3 or 5 segment token without verifying anything
pub fn decode_header(token: &str) -> JwtResult<Header> {
    let segments: Vec<&str> = token.split('.').collect();
    TokenShape::from_segment_count(segments.len())?;
    Header::decode(segments[0])
}

/// Decode a token with the default validation options.
///
/// `resolver` is called once per layer with the parsed header and may
/// return `None` to fall back to the `none` verifier.
pub fn decode_token<F>(token: &str, resolver: F) -> JwtResult<DecodedToken>
where
    F: FnMut(&Header, &mut ValidationOptions) -> JwtResult<Option<KeyResolution>>,
{
    decode_token_with_options(token, ValidationOptions::defaults(), resolver)
}

/// Decode a token with explicit validation options.
///
/// The options are copied for this call; changes made by the resolver apply
/// to the current layer and the layers nested inside it.
pub fn decode_token_with_options<F>(
    token: &str,
    options: &ValidationOptions,
    mut resolver: F,
) -> JwtResult<DecodedToken>
where
    F: FnMut(&Header, &mut ValidationOptions) -> JwtResult<Option<KeyResolution>>,
{
    let mut options = options.clone();
    let mut current = token.to_owned();
    let mut depth = 0usize;

    loop {
        let segments: Vec<&str> = current.split('.').collect();
        let shape = TokenShape::from_segment_count(segments.len()).inspect_err(|_| {
            tracing::warn!(segments = segments.len(), "rejected token with invalid segment count");
        })?;
        if segments.iter().any(|segment| segment.contains('=')) {
            return Err(JwtError::invalid_token("token segments must not be padded"));
        }

        let header = Header::decode(segments[0])?;
        check_supported(&header, shape)?;
        tracing::debug!(?shape, alg = header.alg(), enc = header.enc(), depth, "decoding token layer");

        let resolution = resolver(&header, &mut options)?;
        let payload = match shape {
            TokenShape::Encrypted => decrypt_layer(&header, &segments, resolution, &options)?,
            TokenShape::Unsigned | TokenShape::Signed => {
                verify_layer(&header, &segments, resolution, &options)?
            }
        };

        if header.is_nested() {
            if depth < options.max_nesting_depth {
                depth += 1;
                current = String::from_utf8(payload)
                    .map_err(|_| JwtError::invalid_token("a nested token must be valid UTF-8"))?;
                continue;
            }
            tracing::debug!(depth, "nesting budget exhausted, returning payload as-is");
            return Ok(DecodedToken::Raw(payload));
        }

        return finish(payload, &options);
    }
}

/// Reject headers naming algorithms this engine does not implement
fn check_supported(header: &Header, shape: TokenShape) -> JwtResult<()> {
    let unsupported = |kind: &str, name: &str| {
        tracing::warn!(kind, name, "unsupported algorithm");
        Err(JwtError::UnsupportedToken(format!("unsupported {kind} {name}")))
    };
    match shape {
        TokenShape::Unsigned | TokenShape::Signed => {
            if header.contains_key(ENC) {
                return Err(JwtError::invalid_token("a signed token must not carry enc"));
            }
            match header.alg() {
                Some(alg) if SignatureAlgorithm::from_name(alg).is_none() => {
                    unsupported("signature algorithm", alg)
                }
                _ => Ok(()),
            }
        }
        TokenShape::Encrypted => {
            let alg = header
                .alg()
                .ok_or_else(|| JwtError::invalid_token("an encrypted token must carry alg"))?;
            let enc = header
                .enc()
                .ok_or_else(|| JwtError::invalid_token("an encrypted token must carry enc"))?;
            if KeyManagementAlgorithm::from_name(alg).is_none() {
                return unsupported("key management algorithm", alg);
            }
            if EncryptionAlgorithm::from_name(enc).is_none() {
                return unsupported("encryption algorithm", enc);
            }
            Ok(())
        }
    }
}

fn verify_layer(
    header: &Header,
    segments: &[&str],
    resolution: Option<KeyResolution>,
    options: &ValidationOptions,
) -> JwtResult<Vec<u8>> {
    if header.contains_key(ZIP) {
        return Err(JwtError::invalid_token(
            "compression is only supported on encrypted tokens",
        ));
    }
    let payload = codec::decode(segments[1])?;
    let signature = match segments.get(2) {
        Some(segment) => codec::decode(segment)?,
        None => Vec::new(),
    };

    let verifier: Box<dyn Signer> = match resolution {
        Some(KeyResolution::Verifier(verifier)) => verifier,
        Some(KeyResolution::Decrypter(_)) => {
            return Err(JwtError::invalid_token("a decrypter cannot verify a signed token"))
        }
        None => Box::new(sig::NONE),
    };

    if !options.validate_signature {
        tracing::debug!("signature validation disabled");
        return Ok(payload);
    }

    let alg = header.alg().unwrap_or(SignatureAlgorithm::None.name());
    if verifier.name() != alg {
        tracing::warn!(header_alg = alg, verifier = verifier.name(), "algorithm mismatch");
        return Err(JwtError::InvalidToken(format!(
            "the token is signed with {alg} but the verifier implements {}",
            verifier.name()
        )));
    }

    let secured_input = format!("{}.{}", segments[0], segments[1]);
    if !verifier.verify(&signature, secured_input.as_bytes()) {
        tracing::warn!(alg, "invalid signature");
        return Err(JwtError::invalid_token("invalid signature"));
    }
    Ok(payload)
}

fn decrypt_layer(
    header: &Header,
    segments: &[&str],
    resolution: Option<KeyResolution>,
    options: &ValidationOptions,
) -> JwtResult<Vec<u8>> {
    let decrypter = match resolution {
        Some(KeyResolution::Decrypter(decrypter)) => decrypter,
        Some(KeyResolution::Verifier(_)) => {
            return Err(JwtError::invalid_token("a verifier cannot decrypt an encrypted token"))
        }
        None => return Err(JwtError::invalid_token("no decrypter was resolved for the token")),
    };

    let alg = header.alg().unwrap_or_default();
    let enc = header.enc().unwrap_or_default();
    if decrypter.name() != enc || decrypter.alg().name() != alg {
        tracing::warn!(
            header_alg = alg,
            header_enc = enc,
            decrypter_alg = decrypter.alg().name(),
            decrypter_enc = decrypter.name(),
            "algorithm mismatch"
        );
        return Err(JwtError::InvalidToken(format!(
            "the token uses {alg}/{enc} but the decrypter implements {}/{}",
            decrypter.alg().name(),
            decrypter.name()
        )));
    }

    let inflate = match header.zip() {
        None => false,
        Some(DEFLATE_ZIP_ID) => true,
        Some(other) => {
            return Err(JwtError::InvalidToken(format!(
                "unsupported compression algorithm {other}"
            )))
        }
    };

    let payload = decrypter.decrypt(&TokenParts::from_segments(segments)?)?;
    if inflate {
        Ok(deflate::decompress_with_limit(&payload, options.max_inflated_len)?)
    } else {
        Ok(payload)
    }
}

/// JSON objects are validated as claim sets; anything else is returned raw
fn finish(payload: Vec<u8>, options: &ValidationOptions) -> JwtResult<DecodedToken> {
    match serde_json::from_slice::<serde_json::Value>(&payload) {
        Ok(serde_json::Value::Object(claims)) => {
            claims::validate(&claims, options).inspect_err(|e| {
                tracing::warn!(error = %e, "claim validation failed");
            })?;
            Ok(DecodedToken::Claims(claims))
        }
        _ => Ok(DecodedToken::Raw(payload)),
    }
}
