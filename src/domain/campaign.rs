//! Campaign records and their settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CampaignId, EmailVariant};
use crate::error::ReviewError;

/// Audience of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailType {
    /// Business-to-business.
    B2B,
    /// Business-to-consumer.
    B2C,
}

/// How warm the campaign's recipients are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentLevel {
    /// Recipients already showed buying intent.
    High,
    /// Cold or early-stage recipients.
    Low,
}

/// Settings chosen when a campaign draft is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSettings {
    /// B2B or B2C.
    pub email_type: EmailType,
    /// High or low intent.
    pub intent_level: IntentLevel,
    /// Number of emails; kept equal to `emails.len()`.
    pub number_of_emails: u32,
    /// Username of the client the campaign is for.
    pub client_id: String,
    /// Display name of that client at creation time.
    pub client_name: String,
}

impl CampaignSettings {
    /// Generates `number_of_emails` blank pending emails with sequential ids.
    #[must_use]
    pub fn blank_emails(&self) -> Vec<EmailVariant> {
        (0..self.number_of_emails as usize)
            .map(EmailVariant::blank)
            .collect()
    }
}

/// A named set of emails for a single client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Unique campaign identifier.
    pub id: CampaignId,
    /// Display name.
    pub name: String,
    /// Settings fixed at draft creation.
    pub settings: CampaignSettings,
    /// Ordered emails.
    pub emails: Vec<EmailVariant>,
    /// Time of first save.
    pub created_at: DateTime<Utc>,
    /// Time of the latest save.
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Creates a campaign stamped with the current time.
    #[must_use]
    pub fn new(
        id: CampaignId,
        name: String,
        settings: CampaignSettings,
        emails: Vec<EmailVariant>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            settings,
            emails,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if this campaign is assigned to `client_username`.
    #[must_use]
    pub fn belongs_to(&self, client_username: &str) -> bool {
        self.settings.client_id == client_username
    }

    /// Returns the email at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::EmailOutOfRange`] if `index` is past the end.
    pub fn email(&self, index: usize) -> Result<&EmailVariant, ReviewError> {
        self.emails.get(index).ok_or(ReviewError::EmailOutOfRange {
            index,
            len: self.emails.len(),
        })
    }

    /// Replaces the email at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::EmailOutOfRange`] if `index` is past the end.
    pub fn replace_email(&mut self, index: usize, email: EmailVariant) -> Result<(), ReviewError> {
        let len = self.emails.len();
        let slot = self
            .emails
            .get_mut(index)
            .ok_or(ReviewError::EmailOutOfRange { index, len })?;
        *slot = email;
        Ok(())
    }

    /// Refreshes `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Removes the email at `index` and decrements `number_of_emails` with it.
///
/// # Errors
///
/// Returns [`ReviewError::EmailOutOfRange`] if `index` is past the end.
pub fn remove_email(
    settings: &mut CampaignSettings,
    emails: &mut Vec<EmailVariant>,
    index: usize,
) -> Result<EmailVariant, ReviewError> {
    if index >= emails.len() {
        return Err(ReviewError::EmailOutOfRange {
            index,
            len: emails.len(),
        });
    }
    let removed = emails.remove(index);
    settings.number_of_emails = settings.number_of_emails.saturating_sub(1);
    Ok(removed)
}

#[cfg(test)]
impl Campaign {
    /// Two-email B2B campaign for Habitual Herbs.
    pub(crate) fn sample() -> Self {
        let settings = CampaignSettings {
            email_type: EmailType::B2B,
            intent_level: IntentLevel::High,
            number_of_emails: 2,
            client_id: "kai@habitualherbs.com".to_string(),
            client_name: "Habitual Herbs".to_string(),
        };
        let emails = settings.blank_emails();
        Self::new(CampaignId::generate(), "Spring".to_string(), settings, emails)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ApprovalStatus;

    #[test]
    fn blank_emails_match_count() {
        for n in 1..=10u32 {
            let mut campaign = Campaign::sample();
            campaign.settings.number_of_emails = n;
            let emails = campaign.settings.blank_emails();
            assert_eq!(emails.len(), n as usize);
            for (i, email) in emails.iter().enumerate() {
                assert_eq!(email.id, format!("email-{i}"));
                assert_eq!(email.approval_status, ApprovalStatus::Pending);
            }
        }
    }

    #[test]
    fn remove_email_decrements_count() {
        let mut campaign = Campaign::sample();
        let Ok(removed) = remove_email(&mut campaign.settings, &mut campaign.emails, 0) else {
            panic!("index 0 exists");
        };
        assert_eq!(removed.id, "email-0");
        assert_eq!(campaign.emails.len(), 1);
        assert_eq!(campaign.settings.number_of_emails, 1);
        assert_eq!(campaign.email(0).map(|e| e.id.as_str()).ok(), Some("email-1"));
    }

    #[test]
    fn remove_email_out_of_range_leaves_campaign_intact() {
        let mut campaign = Campaign::sample();
        let result = remove_email(&mut campaign.settings, &mut campaign.emails, 2);
        assert!(matches!(
            result,
            Err(ReviewError::EmailOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(campaign.settings.number_of_emails, 2);
    }

    #[test]
    fn serializes_camel_case() {
        let campaign = Campaign::sample();
        let json = serde_json::to_string(&campaign).unwrap_or_default();
        assert!(json.contains("\"numberOfEmails\":2"));
        assert!(json.contains("\"clientId\":\"kai@habitualherbs.com\""));
        assert!(json.contains("\"emailType\":\"B2B\""));
        assert!(json.contains("\"intentLevel\":\"high\""));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn belongs_to_matches_username_exactly() {
        let campaign = Campaign::sample();
        assert!(campaign.belongs_to("kai@habitualherbs.com"));
        assert!(!campaign.belongs_to("billing@bayshoreplumbers.com"));
    }
}
