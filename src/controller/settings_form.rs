//! Campaign settings form input.

use serde::Deserialize;

use crate::domain::{CampaignSettings, ClientId, EmailType, IntentLevel};
use crate::error::ReviewError;
use crate::service::CredentialStore;

/// Largest number of emails a single campaign may start with.
pub const MAX_EMAILS: u32 = 10;

/// Raw values from the "new campaign" form.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    /// Selected client, `None` while the picker is still on its placeholder.
    pub client_id: Option<ClientId>,
    /// B2B or B2C.
    pub email_type: EmailType,
    /// High or low intent.
    pub intent_level: IntentLevel,
    /// Number of emails exactly as typed.
    pub number_of_emails: String,
}

impl SettingsForm {
    /// Parses the typed email count.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] unless the count is a whole
    /// number between 1 and [`MAX_EMAILS`].
    pub fn email_count(&self) -> Result<u32, ReviewError> {
        let raw = self.number_of_emails.trim();
        match raw.parse::<u32>() {
            Ok(n) if (1..=MAX_EMAILS).contains(&n) => Ok(n),
            _ => Err(ReviewError::Validation(format!(
                "number of emails must be between 1 and {MAX_EMAILS}, got {raw:?}"
            ))),
        }
    }

    /// Resolves the selected client and builds the campaign settings.
    ///
    /// The client is referenced by username and its current display name
    /// is copied in.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if the count is invalid, no
    /// client is selected, or the selected client no longer exists.
    pub fn resolve(&self, credentials: &CredentialStore) -> Result<CampaignSettings, ReviewError> {
        let number_of_emails = self.email_count()?;
        let client_id = self
            .client_id
            .as_ref()
            .ok_or_else(|| ReviewError::Validation("select a client".to_string()))?;
        let client = credentials
            .find_client(client_id)
            .ok_or_else(|| ReviewError::Validation(format!("unknown client: {client_id}")))?;

        Ok(CampaignSettings {
            email_type: self.email_type,
            intent_level: self.intent_level,
            number_of_emails,
            client_id: client.username,
            client_name: client.name,
        })
    }
}
