//! Client accounts managed by the agency.

use serde::{Deserialize, Serialize};

use super::ClientId;
use crate::error::ReviewError;

/// A client account.
///
/// `username` doubles as the key campaigns use to reference their client
/// (`CampaignSettings::client_id`). Passwords are stored as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier.
    pub id: ClientId,
    /// Display name (e.g. `"Habitual Herbs"`).
    pub name: String,
    /// Login name, usually an email address.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// Input for registering a new client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl NewClient {
    /// Checks that every field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ReviewError> {
        let fields = [
            ("name", &self.name),
            ("username", &self.username),
            ("password", &self.password),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ReviewError::Validation(format!(
                    "client {field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Assigns a fresh ID and turns this input into a [`Client`].
    #[must_use]
    pub fn into_client(self) -> Client {
        Client {
            id: ClientId::generate(),
            name: self.name,
            username: self.username,
            password: self.password,
        }
    }
}

/// Built-in clients used when no client list has been stored yet.
#[must_use]
pub fn seed_clients() -> Vec<Client> {
    vec![
        Client {
            id: ClientId::from("bayshore"),
            name: "Bayshore Plumbers".to_string(),
            username: "billing@bayshoreplumbers.com".to_string(),
            password: "Bayshore1$!".to_string(),
        },
        Client {
            id: ClientId::from("herbs"),
            name: "Habitual Herbs".to_string(),
            username: "kai@habitualherbs.com".to_string(),
            password: "Herbs1$!".to_string(),
        },
    ]
}
