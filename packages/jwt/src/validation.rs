//! Token validation options and configuration.

use chrono::Duration;
use once_cell::sync::Lazy;
use sigil_compression::DEFAULT_MAX_INFLATED_LEN;

/// Nested layers followed by default before a payload is returned as-is
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

static DEFAULT_OPTIONS: Lazy<ValidationOptions> = Lazy::new(|| ValidationOptions {
    max_clock_skew: Duration::zero(),
    valid_iss: Vec::new(),
    valid_aud: Vec::new(),
    validate_exp: true,
    validate_nbf: true,
    validate_signature: true,
    max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
    max_inflated_len: DEFAULT_MAX_INFLATED_LEN,
});

/// Token validation options.
///
/// Every decode works on its own copy, so a key resolver may adjust the
/// options of the token it is resolving without affecting other calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Tolerance applied to `exp` and `nbf`.
    pub max_clock_skew: Duration,
    /// Accepted issuers; empty accepts any.
    pub valid_iss: Vec<String>,
    /// Accepted audiences; empty accepts any.
    pub valid_aud: Vec<String>,
    /// Validate expiry.
    pub validate_exp: bool,
    /// Validate not-before.
    pub validate_nbf: bool,
    /// Verify signatures of signed tokens.
    pub validate_signature: bool,
    /// Maximum number of nested token layers to unwrap.
    pub max_nesting_depth: usize,
    /// Largest payload a `zip: "DEF"` token may inflate to, in bytes.
    pub max_inflated_len: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        DEFAULT_OPTIONS.clone()
    }
}

impl ValidationOptions {
    /// The process-wide defaults, which are immutable.
    pub fn defaults() -> &'static ValidationOptions {
        &DEFAULT_OPTIONS
    }

    /// Create validation options that skip signature and time validation.
    ///
    /// # Safety
    /// This should only be used for testing or when the token's origin is
    /// established by other means.
    pub fn insecure_for_testing() -> Self {
        Self {
            validate_exp: false,
            validate_nbf: false,
            validate_signature: false,
            ..Self::default()
        }
    }

    /// Set the clock skew tolerance.
    pub fn with_max_clock_skew(mut self, skew: Duration) -> Self {
        self.max_clock_skew = skew;
        self
    }

    /// Accept only the given issuers.
    pub fn with_valid_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_iss = issuers.into_iter().map(Into::into).collect();
        self
    }

    /// Accept only the given audiences.
    pub fn with_valid_audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_aud = audiences.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether to validate expiration.
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Set whether to validate not-before.
    pub fn validate_not_before(mut self, validate: bool) -> Self {
        self.validate_nbf = validate;
        self
    }

    /// Set whether to verify signatures.
    pub fn verify_signature(mut self, validate: bool) -> Self {
        self.validate_signature = validate;
        self
    }

    /// Set how many nested layers are unwrapped.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Set the largest accepted inflated payload.
    pub fn with_max_inflated_len(mut self, len: usize) -> Self {
        self.max_inflated_len = len;
        self
    }
}
