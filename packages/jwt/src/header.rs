//! The JOSE header: an ordered JSON object with a few reserved parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec;
use crate::error::{JwtError, JwtResult};

/// Algorithm parameter
pub const ALG: &str = "alg";
/// Content encryption parameter
pub const ENC: &str = "enc";
/// Content type parameter
pub const CTY: &str = "cty";
/// Compression parameter
pub const ZIP: &str = "zip";
/// Content type marking a nested token
pub const NESTED_CONTENT_TYPE: &str = "JWT";

const RESERVED: [&str; 4] = [ALG, ENC, CTY, ZIP];

/// Token header.
///
/// Keys keep their insertion order when serialized. Caller-supplied fields
/// are carried through unchanged; the engine only sets `alg` and `enc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Create an empty header
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a field is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The `alg` parameter
    pub fn alg(&self) -> Option<&str> {
        self.str_field(ALG)
    }

    /// The `enc` parameter
    pub fn enc(&self) -> Option<&str> {
        self.str_field(ENC)
    }

    /// The `cty` parameter
    pub fn cty(&self) -> Option<&str> {
        self.str_field(CTY)
    }

    /// The `zip` parameter
    pub fn zip(&self) -> Option<&str> {
        self.str_field(ZIP)
    }

    /// True when `cty` says the payload is itself a token
    pub fn is_nested(&self) -> bool {
        self.cty()
            .is_some_and(|cty| cty.eq_ignore_ascii_case(NESTED_CONTENT_TYPE))
    }

    /// Iterate over fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the header has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Base64url encoding of the header JSON
    pub(crate) fn encode(&self) -> JwtResult<String> {
        let json = serde_json::to_vec(&self.0)
            .map_err(|e| JwtError::InvalidToken(format!("header is not serializable: {e}")))?;
        Ok(codec::encode(json))
    }

    /// Parse the first segment of a token
    pub(crate) fn decode(segment: &str) -> JwtResult<Self> {
        let json = codec::decode(segment)?;
        let header: Header = serde_json::from_slice(&json)
            .map_err(|e| JwtError::InvalidToken(format!("header is not a JSON object: {e}")))?;
        header.check_reserved()?;
        Ok(header)
    }

    /// Reserved parameters must be strings when present
    pub(crate) fn check_reserved(&self) -> JwtResult<()> {
        for key in RESERVED {
            if let Some(value) = self.0.get(key) {
                if !value.is_string() {
                    return Err(JwtError::InvalidToken(format!(
                        "header parameter {key} must be a string"
                    )));
                }
            }
        }
        Ok(())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Header {
    fn from(map: Map<String, Value>) -> Self {
        Header(map)
    }
}
