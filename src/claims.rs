//! # Claims
//!
//! Typed access to decoded identity-token claims.
//!
//! Claims arrive from the token decoder as a JSON mapping. A claim value is
//! one of {string, boolean, number, mapping, null}. The accessors here keep
//! the "absent vs. defect" distinction explicit:
//!
//! - key absent, or present with `null`  → `Ok(None)`
//! - key present with the expected type  → `Ok(Some(value))`
//! - key present with the wrong type     → `Err(ClaimTypeMismatch)`
//!
//! A wrong type is a contract violation by the decoder upstream and is
//! never silently coerced to a default.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{Error, Result};

/// A mapping of claim keys to decoded claim values.
pub type ClaimMap = serde_json::Map<String, Value>;

/// Key under which derived custom claims are serialized.
pub const CUSTOM_CLAIMS_KEY: &str = "custom_claims";

/// Well-known identity claim keys, in serialization order.
///
/// This list drives profile serialization and, together with
/// [`REGISTERED_CLAIM_KEYS`], the custom-claim derivation. Keeping one list
/// for both directions is what prevents a claim from being a profile field
/// on the way out and a custom claim on the way back in.
pub const PROFILE_CLAIM_KEYS: [&str; 20] = [
    "sub",
    "name",
    "given_name",
    "family_name",
    "middle_name",
    "nickname",
    "preferred_username",
    "profile",
    "picture",
    "website",
    "email",
    "email_verified",
    "gender",
    "birthdate",
    "zoneinfo",
    "locale",
    "phone_number",
    "phone_number_verified",
    "address",
    "updated_at",
];

/// Registered token claims that describe the token rather than the user.
const REGISTERED_CLAIM_KEYS: [&str; 11] = [
    "aud",
    "iss",
    "iat",
    "exp",
    "nbf",
    "nonce",
    "azp",
    "auth_time",
    "s_hash",
    "at_hash",
    "c_hash",
];

/// Every claim key that is never a custom claim.
static RESERVED_CLAIM_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    PROFILE_CLAIM_KEYS
        .iter()
        .chain(REGISTERED_CLAIM_KEYS.iter())
        .copied()
        .chain(std::iter::once(CUSTOM_CLAIMS_KEY))
        .collect()
});

/// Whether a claim key belongs to the reserved (non-custom) set.
pub fn is_reserved_claim(key: &str) -> bool {
    RESERVED_CLAIM_KEYS.contains(key)
}

/// Copy of `claims` with every null-valued entry removed.
pub fn without_null_claims(claims: &ClaimMap) -> ClaimMap {
    claims
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// JSON type name for diagnostics.
pub(crate) fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> Error {
    Error::ClaimTypeMismatch {
        key: key.to_string(),
        expected,
        found: value_type(found),
    }
}

/// Extract a string claim.
pub fn string_claim(claims: &ClaimMap, key: &str) -> Result<Option<String>> {
    match claims.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mismatch(key, "string", other)),
    }
}

/// Extract a boolean claim.
pub fn bool_claim(claims: &ClaimMap, key: &str) -> Result<Option<bool>> {
    match claims.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mismatch(key, "boolean", other)),
    }
}

/// Extract a numeric claim.
pub fn number_claim(claims: &ClaimMap, key: &str) -> Result<Option<f64>> {
    match claims.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(mismatch(key, "number", other)),
    }
}

/// Extract a nested mapping claim.
pub fn object_claim(claims: &ClaimMap, key: &str) -> Result<Option<ClaimMap>> {
    match claims.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(mismatch(key, "mapping", other)),
    }
}

/// Extract a mapping claim whose values are all strings.
///
/// Used for the `address` claim. A non-string entry inside the mapping is
/// a defect, same as a wrong-typed claim.
pub fn string_map_claim(claims: &ClaimMap, key: &str) -> Result<Option<HashMap<String, String>>> {
    let Some(map) = object_claim(claims, key)? else {
        return Ok(None);
    };
    let mut out = HashMap::with_capacity(map.len());
    for (entry_key, entry_value) in &map {
        match entry_value {
            Value::String(s) => {
                out.insert(entry_key.clone(), s.clone());
            }
            other => return Err(mismatch(key, "mapping of strings", other)),
        }
    }
    Ok(Some(out))
}

// ============================================================================
// TESTS
// ============================================================================
