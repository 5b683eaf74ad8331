//! Workspace report: per-client campaign progress at a glance.

use serde::Serialize;

use crate::app_state::AppState;
use crate::domain::{Campaign, CampaignId, CampaignProgress};

/// Progress of every campaign assigned to one client.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    /// Client display name.
    pub name: String,
    /// Client username (the campaign reference key).
    pub username: String,
    /// Number of campaigns assigned.
    pub campaigns: usize,
    /// Combined-status tally over all their emails.
    pub progress: CampaignProgress,
}

/// Campaign whose `client_id` matches no existing client.
#[derive(Debug, Clone, Serialize)]
pub struct OrphanedCampaign {
    /// Campaign identifier.
    pub id: CampaignId,
    /// Campaign name.
    pub name: String,
    /// Username the campaign still references.
    pub client_id: String,
}

/// Snapshot of all clients and campaigns.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceReport {
    /// One entry per client, in client-list order.
    pub clients: Vec<ClientSummary>,
    /// Campaigns left behind by deleted clients.
    pub orphaned: Vec<OrphanedCampaign>,
    /// Total number of campaigns stored.
    pub total_campaigns: usize,
}

impl WorkspaceReport {
    /// Reads both stores and builds the report.
    #[must_use]
    pub fn collect(state: &AppState) -> Self {
        let campaigns = state.campaigns.list();
        let clients = state.credentials.list_clients();

        let summaries = clients
            .iter()
            .map(|client| {
                let mine: Vec<&Campaign> = campaigns
                    .iter()
                    .filter(|c| c.belongs_to(&client.username))
                    .collect();
                let mut progress = CampaignProgress::default();
                for campaign in &mine {
                    progress.merge(CampaignProgress::of(campaign));
                }
                ClientSummary {
                    name: client.name.clone(),
                    username: client.username.clone(),
                    campaigns: mine.len(),
                    progress,
                }
            })
            .collect();

        let orphaned = campaigns
            .iter()
            .filter(|c| !clients.iter().any(|client| c.belongs_to(&client.username)))
            .map(|c| OrphanedCampaign {
                id: c.id.clone(),
                name: c.name.clone(),
                client_id: c.settings.client_id.clone(),
            })
            .collect();

        Self {
            clients: summaries,
            orphaned,
            total_campaigns: campaigns.len(),
        }
    }

    /// Emits the report through `tracing`, one event per line item.
    pub fn log(&self) {
        tracing::info!(
            clients = self.clients.len(),
            campaigns = self.total_campaigns,
            orphaned = self.orphaned.len(),
            "workspace summary"
        );
        for client in &self.clients {
            tracing::info!(
                client = %client.name,
                username = %client.username,
                campaigns = client.campaigns,
                approved = client.progress.approved,
                denied = client.progress.denied,
                pending = client.progress.pending,
                "client progress"
            );
        }
        for orphan in &self.orphaned {
            tracing::warn!(
                campaign_id = %orphan.id,
                name = %orphan.name,
                client_id = %orphan.client_id,
                "campaign references unknown client"
            );
        }
    }
}
