//! Change notifications emitted by the campaign store.
//!
//! Every successful write publishes a [`CampaignEvent`] through the
//! [`super::EventBus`] so other open views can refresh their copies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CampaignId;

/// Domain event emitted after every persisted campaign mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CampaignEvent {
    /// A campaign was inserted or replaced.
    CampaignSaved {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Username of the client the campaign belongs to.
        client_id: String,
        /// `true` on first save.
        created: bool,
        /// Save timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A campaign was removed.
    CampaignDeleted {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The whole campaign list was replaced in one write.
    CampaignsReplaced {
        /// Number of campaigns now stored.
        count: usize,
        /// Write timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl CampaignEvent {
    /// Returns the campaign this event concerns, if it targets one.
    #[must_use]
    pub fn campaign_id(&self) -> Option<&CampaignId> {
        match self {
            Self::CampaignSaved { campaign_id, .. } | Self::CampaignDeleted { campaign_id, .. } => {
                Some(campaign_id)
            }
            Self::CampaignsReplaced { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::CampaignSaved { .. } => "campaign_saved",
            Self::CampaignDeleted { .. } => "campaign_deleted",
            Self::CampaignsReplaced { .. } => "campaigns_replaced",
        }
    }
}
