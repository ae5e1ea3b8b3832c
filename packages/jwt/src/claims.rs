//! Registered claim validation: `exp`, `nbf`, `iss` and `aud`
//!
//! Time claims are compared as fractional seconds since the Unix epoch.
//! Claims other than these four are never inspected.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{JwtError, JwtResult};
use crate::validation::ValidationOptions;

/// A decoded claim set
pub type ClaimSet = Map<String, Value>;

/// Validate `claims` against the current time
pub fn validate(claims: &ClaimSet, options: &ValidationOptions) -> JwtResult<()> {
    validate_at(claims, options, Utc::now())
}

/// Validate `claims` as of `now`.
///
/// Checks run in the order `exp`, `nbf`, `iss`, `aud` and stop at the first
/// failure. A present but non-numeric time claim is a claim error.
pub fn validate_at(
    claims: &ClaimSet,
    options: &ValidationOptions,
    now: DateTime<Utc>,
) -> JwtResult<()> {
    let now = now.timestamp_millis() as f64 / 1000.0;
    let skew = options.max_clock_skew.num_milliseconds() as f64 / 1000.0;

    if options.validate_exp {
        validate_exp(claims, now, skew)?;
    }
    if options.validate_nbf {
        validate_nbf(claims, now, skew)?;
    }
    validate_iss(claims, &options.valid_iss)?;
    validate_aud(claims, &options.valid_aud)?;
    Ok(())
}

fn validate_exp(claims: &ClaimSet, now: f64, skew: f64) -> JwtResult<()> {
    if let Some(exp) = time_claim(claims, "exp")? {
        if exp <= now - skew {
            return Err(JwtError::expired("the token has expired"));
        }
    }
    Ok(())
}

fn validate_nbf(claims: &ClaimSet, now: f64, skew: f64) -> JwtResult<()> {
    if let Some(nbf) = time_claim(claims, "nbf")? {
        if nbf > now + skew {
            return Err(JwtError::claim("the token is not valid yet"));
        }
    }
    Ok(())
}

fn validate_iss(claims: &ClaimSet, valid_iss: &[String]) -> JwtResult<()> {
    if valid_iss.is_empty() {
        return Ok(());
    }
    let accepted = claims
        .get("iss")
        .and_then(Value::as_str)
        .is_some_and(|iss| valid_iss.iter().any(|valid| valid == iss));
    if accepted {
        Ok(())
    } else {
        Err(JwtError::claim("the issuer is invalid"))
    }
}

fn validate_aud(claims: &ClaimSet, valid_aud: &[String]) -> JwtResult<()> {
    if valid_aud.is_empty() {
        return Ok(());
    }
    let is_valid = |aud: &str| valid_aud.iter().any(|valid| valid == aud);
    let accepted = match claims.get("aud") {
        Some(Value::String(aud)) => is_valid(aud),
        Some(Value::Array(auds)) => auds.iter().filter_map(Value::as_str).any(is_valid),
        _ => false,
    };
    if accepted {
        Ok(())
    } else {
        Err(JwtError::claim("the audience is invalid"))
    }
}

fn time_claim(claims: &ClaimSet, name: &str) -> JwtResult<Option<f64>> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| JwtError::Claim(format!("the \"{name}\" claim is invalid"))),
    }
}
