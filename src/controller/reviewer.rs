//! Client review controller.
//!
//! Shows only the campaigns assigned to the logged-in user. Content is
//! read-only; every approve/deny click is written straight back to the
//! [`CampaignStore`]. The view keeps its own copy of the list and
//! refreshes it from change notifications published by other views.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::domain::{
    ApprovalStatus, Campaign, CampaignEvent, CampaignId, EmailEdit, User, Variant, ViewMode,
};
use crate::error::ReviewError;
use crate::service::{CampaignStore, SessionStore};

/// Review state for one logged-in user.
#[derive(Debug)]
pub struct CampaignReviewer {
    user: User,
    store: CampaignStore,
    events: broadcast::Receiver<CampaignEvent>,
    campaigns: Vec<Campaign>,
    selected: Option<CampaignId>,
}

impl CampaignReviewer {
    /// Opens the review view for the current session.
    ///
    /// Any logged-in user may open it; it lists the campaigns whose
    /// client is that user's username.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::NotLoggedIn`] without a session.
    pub fn open(sessions: &SessionStore, store: &CampaignStore) -> Result<Self, ReviewError> {
        let user = sessions.require(None)?;
        let events = store.subscribe();
        let campaigns = store.list_for_client(&user.username);
        Ok(Self {
            user,
            store: store.clone(),
            events,
            campaigns,
            selected: None,
        })
    }

    /// Returns the user this view was opened for.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the campaigns assigned to this user, as of the last sync.
    #[must_use]
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Returns the selected campaign.
    #[must_use]
    pub fn selected(&self) -> Option<&Campaign> {
        let id = self.selected.as_ref()?;
        self.campaigns.iter().find(|c| &c.id == id)
    }

    /// Selects a campaign for review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::CampaignNotFound`] unless the campaign is
    /// assigned to this user.
    pub fn select(&mut self, campaign_id: &CampaignId) -> Result<&Campaign, ReviewError> {
        let campaign = self
            .campaigns
            .iter()
            .find(|c| &c.id == campaign_id)
            .ok_or_else(|| ReviewError::CampaignNotFound(campaign_id.clone()))?;
        self.selected = Some(campaign_id.clone());
        Ok(campaign)
    }

    /// Approves or denies one side of an email in the selected campaign
    /// and persists the campaign immediately.
    ///
    /// Pending change notifications are applied first, so the write
    /// starts from the latest stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] with no selection or when
    /// reviewing side B of an email without an A/B test,
    /// [`ReviewError::EmailOutOfRange`] for a bad index, or a storage
    /// error if the write fails.
    pub fn set_approval(
        &mut self,
        email_index: usize,
        variant: Variant,
        status: ApprovalStatus,
    ) -> Result<Campaign, ReviewError> {
        self.sync();
        let mut campaign = self
            .selected()
            .cloned()
            .ok_or_else(|| ReviewError::Validation("no campaign selected".to_string()))?;

        let edited = campaign
            .email(email_index)?
            .apply(EmailEdit::Review { variant, status }, ViewMode::Client)?;
        campaign.replace_email(email_index, edited)?;
        campaign.touch();

        let saved = self.store.save(campaign)?;
        if let Some(local) = self.campaigns.iter_mut().find(|c| c.id == saved.id) {
            *local = saved.clone();
        }

        tracing::info!(
            campaign_id = %saved.id,
            email_index,
            ?variant,
            %status,
            username = %self.user.username,
            "email reviewed"
        );
        Ok(saved)
    }

    /// Applies any pending change notifications without waiting.
    ///
    /// Returns `true` if the list was reloaded.
    pub fn sync(&mut self) -> bool {
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => stale |= self.concerns(&event),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "review view lagged behind campaign events");
                    stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.reload();
        }
        stale
    }

    /// Waits for the next change notification, then syncs.
    ///
    /// Returns `false` once the event bus has shut down.
    pub async fn changed(&mut self) -> bool {
        let stale = match self.events.recv().await {
            Ok(event) => self.concerns(&event),
            Err(RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "review view lagged behind campaign events");
                true
            }
            Err(RecvError::Closed) => return false,
        };
        if !self.sync() && stale {
            self.reload();
        }
        true
    }

    /// Returns `true` if `event` may change what this view shows.
    fn concerns(&self, event: &CampaignEvent) -> bool {
        match event {
            CampaignEvent::CampaignSaved {
                campaign_id,
                client_id,
                ..
            } => client_id == &self.user.username || self.shows(campaign_id),
            CampaignEvent::CampaignDeleted { campaign_id, .. } => self.shows(campaign_id),
            CampaignEvent::CampaignsReplaced { .. } => true,
        }
    }

    fn shows(&self, campaign_id: &CampaignId) -> bool {
        self.campaigns.iter().any(|c| &c.id == campaign_id)
    }

    fn reload(&mut self) {
        self.campaigns = self.store.list_for_client(&self.user.username);
        if let Some(id) = &self.selected
            && !self.shows(id)
        {
            tracing::debug!(campaign_id = %id, "selected campaign no longer available");
            self.selected = None;
        }
    }
}
