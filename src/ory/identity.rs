//! Typed view of an exported Ory identity
//!
//! Only the fields the account transform reads are modelled; everything else
//! in the export is ignored. Trait fields are optional here so that a missing
//! one surfaces as a named transform error instead of a parse failure.
//!
//! The index keeps raw records; an identity is only parsed when an account
//! joins against it.

use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Raw identity records keyed by id, as written by the export
pub type IdentityIndex = HashMap<String, Value>;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub traits: Traits,
    #[serde(default)]
    pub metadata_public: Option<PublicMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Traits {
    pub email: Option<String>,
    pub name: Option<NameTraits>,
    pub bio: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NameTraits {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PublicMetadata {
    #[serde(default)]
    pub flags: Option<Vec<String>>,
}

impl Identity {
    /// Parse the fields the transform needs out of a raw identity record
    pub fn from_record(id: &str, record: &Value) -> Result<Self> {
        Identity::deserialize(record).with_context(|| format!("Invalid identity '{}'", id))
    }

    /// Feature flags from public metadata, empty when absent
    pub fn flags(&self) -> Vec<String> {
        self.metadata_public
            .as_ref()
            .and_then(|m| m.flags.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_identity() {
        let identity: Identity = serde_json::from_value(json!({
            "id": "i1",
            "schema_id": "default",
            "state": "active",
            "traits": {
                "email": "a@x.com",
                "name": {"first_name": "Ann", "last_name": "Lee"},
                "bio": "Geographer",
                "country": "NZ"
            },
            "metadata_public": {"flags": ["admin", "create_repository"]}
        }))
        .unwrap();

        assert_eq!(identity.traits.email.as_deref(), Some("a@x.com"));
        assert_eq!(identity.traits.country.as_deref(), Some("NZ"));
        assert_eq!(identity.flags(), vec!["admin", "create_repository"]);
    }

    #[test]
    fn test_from_record_names_bad_identity() {
        let err = Identity::from_record("i9", &json!({"id": "i9", "traits": {"country": 5}}))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid identity 'i9'"));
    }

    #[test]
    fn test_flags_default_empty() {
        let null_metadata: Identity =
            serde_json::from_value(json!({"id": "i1", "traits": {}, "metadata_public": null}))
                .unwrap();
        assert!(null_metadata.flags().is_empty());

        let no_flags: Identity =
            serde_json::from_value(json!({"id": "i1", "metadata_public": {"plan": "free"}}))
                .unwrap();
        assert!(no_flags.flags().is_empty());
    }
}
