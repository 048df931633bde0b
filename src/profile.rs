//! # User Profile
//!
//! The canonical identity record decoded from an identity token, and the
//! bidirectional conversion between it and a claim mapping.
//!
//! ## Shape
//!
//! The native SDK's profile constructor only accepts a narrow set of
//! fields (subject, name, given/family name, nickname, picture, email,
//! email-verified). Everything else the token carries (middle name,
//! preferred username, locale, phone number, address, and so on) lives in
//! the `extra_info` mapping, which stores the *entire* filtered claim set,
//! constructor fields included. `extra_info` is the single source of truth
//! for every non-constructor field; the accessors below perform the typed
//! extraction on demand instead of duplicating state.
//!
//! ## Directions
//!
//! - [`UserProfile::from_claims`] builds a profile from a decoded claim
//!   mapping, dropping null claims and failing fast on a wrong-typed
//!   constructor claim.
//! - [`UserProfile::to_map`] serializes the 21 fixed keys (the 20 identity
//!   claims plus `custom_claims`) for the scripting side. It is total:
//!   absent fields serialize as `null`, never as an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claims::{self, is_reserved_claim, without_null_claims, ClaimMap, CUSTOM_CLAIMS_KEY};
use crate::error::Result;

/// Canonical decoded-identity record
///
/// Constructor fields mirror the native SDK's profile constructor; the
/// remaining identity claims are reachable through the typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Subject identifier (the `sub` claim)
    pub id: Option<String>,
    /// Full name
    pub name: Option<String>,
    /// Given name
    pub given_name: Option<String>,
    /// Family name
    pub family_name: Option<String>,
    /// Casual name
    pub nickname: Option<String>,
    /// Profile picture URL (the `picture` claim)
    pub picture_url: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Whether the email address has been verified
    pub email_verified: Option<bool>,

    /// Linked provider identities. Required by the SDK's profile shape but
    /// never part of a claim set; always empty here.
    pub identities: Vec<Value>,
    /// Application metadata; never part of a claim set
    pub app_metadata: ClaimMap,
    /// User metadata; never part of a claim set
    pub user_metadata: ClaimMap,
    /// Account creation time; never part of a claim set
    pub created_at: Option<DateTime<Utc>>,

    extra_info: ClaimMap,
}

impl UserProfile {
    /// Build a profile from a decoded claim mapping.
    ///
    /// Null-valued claims are dropped before anything else. Constructor
    /// fields are extracted with a typed lookup; a wrong-typed value is a
    /// decoder contract violation and fails the whole conversion. The
    /// entire filtered mapping is kept as `extra_info`, including the
    /// fields extracted here, so the accessors can recover every claim.
    pub fn from_claims(source: &ClaimMap) -> Result<Self> {
        let extra_info = without_null_claims(source);

        Ok(Self {
            id: claims::string_claim(&extra_info, "sub")?,
            name: claims::string_claim(&extra_info, "name")?,
            given_name: claims::string_claim(&extra_info, "given_name")?,
            family_name: claims::string_claim(&extra_info, "family_name")?,
            nickname: claims::string_claim(&extra_info, "nickname")?,
            picture_url: claims::string_claim(&extra_info, "picture")?,
            email: claims::string_claim(&extra_info, "email")?,
            email_verified: claims::bool_claim(&extra_info, "email_verified")?,
            identities: Vec::new(),
            app_metadata: ClaimMap::new(),
            user_metadata: ClaimMap::new(),
            created_at: None,
            extra_info,
        })
    }

    /// The stored claim mapping backing the non-constructor accessors.
    pub fn extra_info(&self) -> &ClaimMap {
        &self.extra_info
    }

    /// Serialize the profile for the scripting side.
    ///
    /// Emits exactly the 20 well-known identity keys plus `custom_claims`.
    /// Constructor-backed keys come from the struct fields; the rest are
    /// copied raw from `extra_info` so the function stays total even when
    /// a stored claim has an unexpected type.
    pub fn to_map(&self) -> ClaimMap {
        let mut map = ClaimMap::new();
        map.insert("sub".into(), opt_string(&self.id));
        map.insert("name".into(), opt_string(&self.name));
        map.insert("given_name".into(), opt_string(&self.given_name));
        map.insert("family_name".into(), opt_string(&self.family_name));
        map.insert("middle_name".into(), self.raw("middle_name"));
        map.insert("nickname".into(), opt_string(&self.nickname));
        map.insert("preferred_username".into(), self.raw("preferred_username"));
        map.insert("profile".into(), self.raw("profile"));
        map.insert("picture".into(), opt_string(&self.picture_url));
        map.insert("website".into(), self.raw("website"));
        map.insert("email".into(), opt_string(&self.email));
        map.insert(
            "email_verified".into(),
            self.email_verified.map(Value::Bool).unwrap_or(Value::Null),
        );
        map.insert("gender".into(), self.raw("gender"));
        map.insert("birthdate".into(), self.raw("birthdate"));
        map.insert("zoneinfo".into(), self.raw("zoneinfo"));
        map.insert("locale".into(), self.raw("locale"));
        map.insert("phone_number".into(), self.raw("phone_number"));
        map.insert("phone_number_verified".into(), self.raw("phone_number_verified"));
        map.insert("address".into(), self.raw("address"));
        map.insert("updated_at".into(), self.raw("updated_at"));
        map.insert(CUSTOM_CLAIMS_KEY.into(), Value::Object(self.custom_claims()));
        map
    }

    /// Claims that are neither well-known identity fields nor registered
    /// token claims.
    ///
    /// Claims that already round-tripped through [`to_map`](Self::to_map)
    /// arrive nested under the `custom_claims` key; they remain custom
    /// claims and are merged back in, still filtered through the reserved
    /// set.
    pub fn custom_claims(&self) -> ClaimMap {
        let mut custom = ClaimMap::new();
        if let Some(Value::Object(nested)) = self.extra_info.get(CUSTOM_CLAIMS_KEY) {
            for (key, value) in nested {
                if !is_reserved_claim(key) {
                    custom.insert(key.clone(), value.clone());
                }
            }
        }
        for (key, value) in &self.extra_info {
            if !is_reserved_claim(key) {
                custom.insert(key.clone(), value.clone());
            }
        }
        custom
    }

    fn raw(&self, key: &str) -> Value {
        self.extra_info.get(key).cloned().unwrap_or(Value::Null)
    }

    // ------------------------------------------------------------------------
    // Typed accessors over extra_info
    // ------------------------------------------------------------------------

    /// Subject identifier, as stored in the claim mapping.
    pub fn sub(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "sub")
    }

    /// Middle name.
    pub fn middle_name(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "middle_name")
    }

    /// Preferred username.
    pub fn preferred_username(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "preferred_username")
    }

    /// Profile page URL (the `profile` claim).
    pub fn profile_url(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "profile")
    }

    /// Website URL (the `website` claim).
    pub fn website_url(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "website")
    }

    /// Gender.
    pub fn gender(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "gender")
    }

    /// Birthdate.
    pub fn birthdate(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "birthdate")
    }

    /// Time zone (the `zoneinfo` claim).
    pub fn zoneinfo(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "zoneinfo")
    }

    /// Locale.
    pub fn locale(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "locale")
    }

    /// Phone number.
    pub fn phone_number(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "phone_number")
    }

    /// Whether the phone number has been verified.
    pub fn phone_number_verified(&self) -> Result<Option<bool>> {
        claims::bool_claim(&self.extra_info, "phone_number_verified")
    }

    /// Last profile update, as the token's string timestamp.
    pub fn updated_at(&self) -> Result<Option<String>> {
        claims::string_claim(&self.extra_info, "updated_at")
    }

    /// Postal address mapping.
    pub fn address(&self) -> Result<Option<HashMap<String, String>>> {
        claims::string_map_claim(&self.extra_info, "address")
    }
}

fn opt_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::PROFILE_CLAIM_KEYS;
    use crate::error::Error;
    use serde_json::json;

    fn claim_map(value: Value) -> ClaimMap {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_claims_populates_constructor_fields() {
        let source = claim_map(json!({
            "sub": "auth0|123",
            "name": "Jo Doe",
            "given_name": "Jo",
            "family_name": "Doe",
            "nickname": "jo",
            "picture": "https://cdn.example.com/jo.png",
            "email": "jo@example.com",
            "email_verified": true,
        }));
        let profile = UserProfile::from_claims(&source).unwrap();

        assert_eq!(profile.id.as_deref(), Some("auth0|123"));
        assert_eq!(profile.name.as_deref(), Some("Jo Doe"));
        assert_eq!(profile.given_name.as_deref(), Some("Jo"));
        assert_eq!(profile.family_name.as_deref(), Some("Doe"));
        assert_eq!(profile.nickname.as_deref(), Some("jo"));
        assert_eq!(
            profile.picture_url.as_deref(),
            Some("https://cdn.example.com/jo.png")
        );
        assert_eq!(profile.email.as_deref(), Some("jo@example.com"));
        assert_eq!(profile.email_verified, Some(true));
    }

    #[test]
    fn test_from_claims_keeps_every_claim_in_extra_info() {
        let source = claim_map(json!({ "sub": "abc", "name": "Jo", "custom_x": 5 }));
        let profile = UserProfile::from_claims(&source).unwrap();

        assert_eq!(profile.extra_info().len(), 3);
        assert_eq!(profile.extra_info()["sub"], "abc");
        assert_eq!(profile.custom_claims(), claim_map(json!({ "custom_x": 5 })));
    }

    #[test]
    fn test_from_claims_drops_null_claims() {
        let source = claim_map(json!({ "sub": "abc", "gender": null }));
        let profile = UserProfile::from_claims(&source).unwrap();

        assert!(!profile.extra_info().contains_key("gender"));
        assert_eq!(profile.gender().unwrap(), None);
    }

    #[test]
    fn test_from_claims_fails_fast_on_wrong_typed_constructor_claim() {
        let source = claim_map(json!({ "sub": "abc", "email_verified": "yes" }));
        let err = UserProfile::from_claims(&source).unwrap_err();
        assert!(matches!(
            err,
            Error::ClaimTypeMismatch { ref key, expected: "boolean", .. } if key == "email_verified"
        ));
    }

    #[test]
    fn test_structural_fields_default_to_empty() {
        let profile = UserProfile::from_claims(&claim_map(json!({ "sub": "abc" }))).unwrap();
        assert!(profile.identities.is_empty());
        assert!(profile.app_metadata.is_empty());
        assert!(profile.user_metadata.is_empty());
        assert!(profile.created_at.is_none());
    }

    #[test]
    fn test_accessors_distinguish_absent_from_defect() {
        let profile = UserProfile::from_claims(&claim_map(json!({
            "sub": "abc",
            "middle_name": 5,
            "locale": "en-NZ",
        })))
        .unwrap();

        // locale present with the right type
        assert_eq!(profile.locale().unwrap().as_deref(), Some("en-NZ"));
        // preferred_username absent entirely
        assert_eq!(profile.preferred_username().unwrap(), None);
        // middle_name present with the wrong type; the non-constructor
        // claim passes from_claims but the accessor reports the defect
        assert!(profile.middle_name().is_err());
    }

    #[test]
    fn test_address_accessor() {
        let profile = UserProfile::from_claims(&claim_map(json!({
            "address": { "country": "NZ", "postal_code": "6011" },
        })))
        .unwrap();
        let address = profile.address().unwrap().unwrap();
        assert_eq!(address["country"], "NZ");
        assert_eq!(address["postal_code"], "6011");
    }

    #[test]
    fn test_to_map_serializes_all_fixed_keys() {
        let profile = UserProfile::from_claims(&ClaimMap::new()).unwrap();
        let map = profile.to_map();

        assert_eq!(map.len(), PROFILE_CLAIM_KEYS.len() + 1);
        for key in PROFILE_CLAIM_KEYS {
            assert!(map.contains_key(key), "missing key {}", key);
            assert!(map[key].is_null(), "{} should serialize as null", key);
        }
        assert_eq!(map[CUSTOM_CLAIMS_KEY], json!({}));
    }

    #[test]
    fn test_to_map_serializes_populated_fields() {
        let profile = UserProfile::from_claims(&claim_map(json!({
            "sub": "auth0|123",
            "name": "Jo",
            "email_verified": false,
            "updated_at": "2024-03-01T10:00:00.000Z",
            "address": { "country": "NZ" },
            "https://example.com/roles": ["admin"],
        })))
        .unwrap();
        let map = profile.to_map();

        assert_eq!(map["sub"], "auth0|123");
        assert_eq!(map["name"], "Jo");
        assert_eq!(map["email_verified"], false);
        assert_eq!(map["updated_at"], "2024-03-01T10:00:00.000Z");
        assert_eq!(map["address"], json!({ "country": "NZ" }));
        assert_eq!(
            map[CUSTOM_CLAIMS_KEY],
            json!({ "https://example.com/roles": ["admin"] })
        );
    }

    #[test]
    fn test_custom_claims_excludes_reserved_keys() {
        let profile = UserProfile::from_claims(&claim_map(json!({
            "sub": "abc",
            "iss": "https://tenant.example.com/",
            "aud": "client123",
            "plan": "pro",
        })))
        .unwrap();
        let custom = profile.custom_claims();

        assert_eq!(custom, claim_map(json!({ "plan": "pro" })));
        for key in PROFILE_CLAIM_KEYS {
            assert!(!custom.contains_key(key));
        }
    }

    #[test]
    fn test_custom_claims_filters_nested_reserved_keys() {
        // A reserved key smuggled inside a serialized custom_claims mapping
        // must not resurface as a custom claim.
        let profile = UserProfile::from_claims(&claim_map(json!({
            "custom_claims": { "sub": "spoofed", "shade": "ochre" },
            "plan": "pro",
        })))
        .unwrap();
        let custom = profile.custom_claims();

        assert!(!custom.contains_key("sub"));
        assert_eq!(custom["shade"], "ochre");
        assert_eq!(custom["plan"], "pro");
    }

    #[test]
    fn test_round_trip_is_fixed_point() {
        let source = claim_map(json!({
            "sub": "auth0|123",
            "name": "Jo",
            "email": "jo@example.com",
            "email_verified": true,
            "locale": "en-NZ",
            "updated_at": "2024-03-01T10:00:00.000Z",
            "address": { "country": "NZ" },
            "iss": "https://tenant.example.com/",
            "https://example.com/roles": ["admin"],
        }));

        let first = UserProfile::from_claims(&source).unwrap();
        let once = first.to_map();
        let second = UserProfile::from_claims(&once).unwrap();
        let twice = second.to_map();

        assert_eq!(once, twice);
        // the custom claim survives the round trip at the same place
        assert_eq!(
            twice[CUSTOM_CLAIMS_KEY],
            json!({ "https://example.com/roles": ["admin"] })
        );
    }

    #[test]
    fn test_profile_serialization() {
        let profile = UserProfile::from_claims(&claim_map(json!({
            "sub": "auth0|123",
            "name": "Jo",
        })))
        .unwrap();

        let json = serde_json::to_string(&profile).unwrap();
        let restored: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, restored);
    }
}
