//! Claim set and decode result types

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{JwtError, JwtResult};

/// Registered claims plus arbitrary custom claims.
///
/// Serializes to a flat JSON object; absent registered claims are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiration time, in seconds since the epoch; may be fractional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<Number>,
    /// Not before, in seconds since the epoch; may be fractional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<Number>,
    /// Issued at, in seconds since the epoch; may be fractional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<Number>,
    /// Token ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Custom claims, flattened into the root object
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

/// `aud` is either a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// One audience
    Single(String),
    /// Several audiences
    Multiple(Vec<String>),
}

impl Claims {
    /// Empty claim set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issuer
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set the subject
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set a single audience
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(Audience::Single(aud.into()));
        self
    }

    /// Set several audiences
    #[must_use]
    pub fn audiences<I, S>(mut self, auds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aud = Some(Audience::Multiple(auds.into_iter().map(Into::into).collect()));
        self
    }

    /// Expire at an absolute time
    #[must_use]
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.exp = Some(Number::from(at.timestamp()));
        self
    }

    /// Expire `ttl` from now
    #[must_use]
    pub fn expires_in(self, ttl: Duration) -> Self {
        self.expires_at(Utc::now() + ttl)
    }

    /// Not valid before an absolute time
    #[must_use]
    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.nbf = Some(Number::from(at.timestamp()));
        self
    }

    /// Stamp `iat` with the current time
    #[must_use]
    pub fn issued_now(mut self) -> Self {
        self.iat = Some(Number::from(Utc::now().timestamp()));
        self
    }

    /// Set the token ID
    #[must_use]
    pub fn token_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// `exp` as a point in time, truncated to whole milliseconds
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.exp.as_ref().and_then(number_to_time)
    }

    /// `nbf` as a point in time, truncated to whole milliseconds
    pub fn not_valid_before(&self) -> Option<DateTime<Utc>> {
        self.nbf.as_ref().and_then(number_to_time)
    }

    /// Add a custom claim
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }
}

fn number_to_time(seconds: &Number) -> Option<DateTime<Utc>> {
    let millis = seconds.as_f64()? * 1000.0;
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Result of decoding a token
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedToken {
    /// The payload was a JSON object and passed claim validation
    Claims(Map<String, Value>),
    /// Any other payload, returned byte for byte
    Raw(Vec<u8>),
}

impl DecodedToken {
    /// Borrow the claim set, if the payload was one
    pub fn claims(&self) -> Option<&Map<String, Value>> {
        match self {
            DecodedToken::Claims(claims) => Some(claims),
            DecodedToken::Raw(_) => None,
        }
    }

    /// Borrow the raw payload, if the payload was not a claim set
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            DecodedToken::Raw(bytes) => Some(bytes),
            DecodedToken::Claims(_) => None,
        }
    }

    /// Deserialize the claim set into a typed structure
    pub fn into_claims<T: DeserializeOwned>(self) -> JwtResult<T> {
        match self {
            DecodedToken::Claims(claims) => serde_json::from_value(Value::Object(claims))
                .map_err(|e| JwtError::Claim(format!("claims do not match the expected shape: {e}"))),
            DecodedToken::Raw(_) => Err(JwtError::claim("the payload is not a claim set")),
        }
    }
}
