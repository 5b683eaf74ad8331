//! Type-safe record identifiers.
//!
//! [`CampaignId`] and [`ClientId`] are string newtypes so a campaign ID can
//! never be passed where a client ID is expected. Stored IDs are arbitrary
//! strings (the seed clients use `bayshore` and `herbs`); freshly generated
//! IDs embed a UUID v7, which is ordered by creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a campaign.
///
/// Generated once at first save and immutable thereafter. Used as the
/// match key for in-place replacement in [`crate::service::CampaignStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Creates a new timestamp-ordered `CampaignId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("campaign-{}", uuid::Uuid::now_v7()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CampaignId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unique identifier for a client account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new timestamp-ordered `ClientId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("client-{}", uuid::Uuid::now_v7()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ClientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn generate_yields_unique_ids() {
        let a = CampaignId::generate();
        let b = CampaignId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("campaign-"));
    }

    #[test]
    fn generated_client_ids_are_prefixed() {
        let first = ClientId::generate();
        let second = ClientId::generate();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("client-"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ClientId::from("herbs");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"herbs\"");
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = CampaignId::from("campaign-1");
        let mut map = HashMap::new();
        map.insert(id.clone(), "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
