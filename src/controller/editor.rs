//! Agency campaign editor.
//!
//! Holds a draft (settings, emails, name) in memory and writes it to the
//! [`CampaignStore`] only on explicit save or on rename of a draft that
//! already has settings.
//!
//! Writes from other views reach the draft through change notifications.
//! Before every save the editor folds them in with a three-way merge
//! against the copy it last loaded: fields changed locally win, all
//! others take the stored value.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::app_state::AppState;
use crate::domain::{
    Campaign, CampaignEvent, CampaignId, CampaignSettings, EmailEdit, EmailVariant, Role,
    ViewMode, remove_email,
};
use crate::error::ReviewError;
use crate::service::{CampaignStore, CredentialStore};

use super::SettingsForm;

/// Name given to a campaign saved without one.
pub const UNTITLED: &str = "Untitled Campaign";

/// Editing state for the agency view.
#[derive(Debug)]
pub struct CampaignEditor {
    campaigns: CampaignStore,
    credentials: CredentialStore,
    events: broadcast::Receiver<CampaignEvent>,
    view_mode: ViewMode,
    selected: Option<Campaign>,
    settings: Option<CampaignSettings>,
    emails: Vec<EmailVariant>,
    name: String,
    has_edited_name: bool,
    delete_requested: bool,
}

impl CampaignEditor {
    /// Creates an editor with an empty draft.
    #[must_use]
    pub fn new(campaigns: CampaignStore, credentials: CredentialStore) -> Self {
        Self {
            events: campaigns.subscribe(),
            campaigns,
            credentials,
            view_mode: ViewMode::Agency,
            selected: None,
            settings: None,
            emails: Vec::new(),
            name: String::new(),
            has_edited_name: false,
            delete_requested: false,
        }
    }

    /// Opens the editor for the logged-in agency user.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::NotLoggedIn`] or [`ReviewError::WrongRole`]
    /// unless the session belongs to the agency.
    pub fn open(state: &AppState) -> Result<Self, ReviewError> {
        state.sessions.require(Some(Role::Agency))?;
        Ok(Self::new(state.campaigns.clone(), state.credentials.clone()))
    }

    /// Returns every stored campaign, read fresh from the store.
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.campaigns.list()
    }

    /// Returns the last saved (or selected) campaign backing the draft.
    #[must_use]
    pub fn selected(&self) -> Option<&Campaign> {
        self.selected.as_ref()
    }

    /// Returns the draft's settings, `None` until the settings form is submitted.
    #[must_use]
    pub fn settings(&self) -> Option<&CampaignSettings> {
        self.settings.as_ref()
    }

    /// Returns the draft's emails.
    #[must_use]
    pub fn emails(&self) -> &[EmailVariant] {
        &self.emails
    }

    /// Returns the draft's current name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if saving should first ask for a campaign name.
    #[must_use]
    pub fn needs_name_prompt(&self) -> bool {
        !self.has_edited_name
    }

    /// Returns the mode email edits are checked against.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switches between editing and previewing the draft as the client
    /// sees it. Review clicks made in client mode change only the draft.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode != self.view_mode {
            tracing::debug!(%mode, "editor view mode changed");
        }
        self.view_mode = mode;
    }

    fn require_agency_mode(&self, field: &'static str) -> Result<(), ReviewError> {
        if self.view_mode.can_edit_content() {
            Ok(())
        } else {
            Err(ReviewError::ReadOnly {
                field,
                mode: self.view_mode,
            })
        }
    }

    /// Returns `true` while a delete is awaiting confirmation.
    #[must_use]
    pub fn is_delete_pending(&self) -> bool {
        self.delete_requested
    }

    /// Discards the draft and starts over.
    pub fn new_campaign(&mut self) {
        self.selected = None;
        self.settings = None;
        self.emails.clear();
        self.name.clear();
        self.has_edited_name = false;
        self.delete_requested = false;
    }

    /// Loads a stored campaign into the editor.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::CampaignNotFound`] if no such campaign is stored.
    pub fn select(&mut self, campaign_id: &CampaignId) -> Result<(), ReviewError> {
        let campaign = self
            .campaigns
            .get(campaign_id)
            .ok_or_else(|| ReviewError::CampaignNotFound(campaign_id.clone()))?;
        self.load(campaign);
        Ok(())
    }

    fn load(&mut self, campaign: Campaign) {
        self.settings = Some(campaign.settings.clone());
        self.emails = campaign.emails.clone();
        self.name = campaign.name.clone();
        self.has_edited_name = true;
        self.delete_requested = false;
        self.selected = Some(campaign);
    }

    /// Starts a draft from the settings form, generating blank emails.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if the form is invalid or the
    /// draft already has settings (they are fixed once chosen), or
    /// [`ReviewError::ReadOnly`] in client view mode.
    pub fn submit_settings(&mut self, form: &SettingsForm) -> Result<(), ReviewError> {
        self.require_agency_mode("settings")?;
        if self.settings.is_some() {
            return Err(ReviewError::Validation(
                "campaign settings are already chosen; start a new campaign".to_string(),
            ));
        }
        let settings = form.resolve(&self.credentials)?;
        self.emails = settings.blank_emails();
        tracing::debug!(
            client_id = %settings.client_id,
            emails = settings.number_of_emails,
            "campaign draft started"
        );
        self.settings = Some(settings);
        Ok(())
    }

    /// Applies an edit to the email at `index` under the current view mode.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::EmailOutOfRange`] for a bad index, or
    /// [`ReviewError::ReadOnly`] if the mode does not allow the edit.
    pub fn edit_email(&mut self, index: usize, edit: EmailEdit) -> Result<(), ReviewError> {
        let len = self.emails.len();
        let slot = self
            .emails
            .get_mut(index)
            .ok_or(ReviewError::EmailOutOfRange { index, len })?;
        *slot = slot.apply(edit, self.view_mode)?;
        Ok(())
    }

    /// Deletes the email at `index` and decrements the email count.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] before settings are chosen,
    /// [`ReviewError::EmailOutOfRange`] for a bad index, or
    /// [`ReviewError::ReadOnly`] in client view mode.
    pub fn delete_email(&mut self, index: usize) -> Result<(), ReviewError> {
        self.require_agency_mode("emails")?;
        let settings = self
            .settings
            .as_mut()
            .ok_or_else(|| ReviewError::Validation("no campaign settings chosen".to_string()))?;
        remove_email(settings, &mut self.emails, index)?;
        Ok(())
    }

    /// Renames the draft. A blank name is ignored.
    ///
    /// Saves immediately when the draft already has settings and returns
    /// the stored campaign.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the auto-save fails.
    pub fn rename(&mut self, name: &str) -> Result<Option<Campaign>, ReviewError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.name = name.to_string();
        self.has_edited_name = true;
        if self.settings.is_some() {
            return self.save(None).map(Some);
        }
        Ok(None)
    }

    /// Saves the draft, inserting or replacing it in the store.
    ///
    /// Pending changes from other views are merged in first. The name is
    /// the edited name if there is one, else `provided_name`, else
    /// [`UNTITLED`].
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] before settings are chosen, or
    /// a storage error if the write fails.
    pub fn save(&mut self, provided_name: Option<&str>) -> Result<Campaign, ReviewError> {
        self.sync();
        let settings = self
            .settings
            .clone()
            .ok_or_else(|| ReviewError::Validation("no campaign settings chosen".to_string()))?;

        let name = if self.has_edited_name {
            self.name.clone()
        } else {
            provided_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNTITLED)
                .to_string()
        };

        let draft = match &self.selected {
            Some(existing) => Campaign {
                name,
                settings,
                emails: self.emails.clone(),
                ..existing.clone()
            },
            None => Campaign::new(CampaignId::generate(), name, settings, self.emails.clone()),
        };

        let saved = self.campaigns.save(draft)?;
        self.load(saved.clone());
        Ok(saved)
    }

    /// Asks for confirmation before deleting the selected campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if no saved campaign is selected,
    /// or [`ReviewError::ReadOnly`] in client view mode.
    pub fn request_delete(&mut self) -> Result<(), ReviewError> {
        self.require_agency_mode("campaign")?;
        if self.selected.is_none() {
            return Err(ReviewError::Validation(
                "no saved campaign selected".to_string(),
            ));
        }
        self.delete_requested = true;
        Ok(())
    }

    /// Withdraws a pending delete request.
    pub fn cancel_delete(&mut self) {
        self.delete_requested = false;
    }

    /// Deletes the selected campaign and resets to an empty draft.
    ///
    /// Returns whether the store held the campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] without a prior
    /// [`Self::request_delete`], or a storage error if the write fails.
    pub fn confirm_delete(&mut self) -> Result<bool, ReviewError> {
        if !self.delete_requested {
            return Err(ReviewError::Validation(
                "delete was not requested".to_string(),
            ));
        }
        let Some(campaign_id) = self.selected.as_ref().map(|c| c.id.clone()) else {
            self.delete_requested = false;
            return Err(ReviewError::Validation(
                "no saved campaign selected".to_string(),
            ));
        };
        let removed = self.campaigns.delete(&campaign_id)?;
        self.new_campaign();
        Ok(removed)
    }

    /// Applies any pending change notifications without waiting.
    ///
    /// When the selected campaign was written elsewhere, the draft is
    /// merged with the stored copy. Returns `true` if that happened.
    pub fn sync(&mut self) -> bool {
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => stale |= self.concerns(&event),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "editor lagged behind campaign events");
                    stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.rebase();
        }
        stale
    }

    fn concerns(&self, event: &CampaignEvent) -> bool {
        let Some(selected) = &self.selected else {
            return false;
        };
        event.campaign_id().is_none_or(|id| id == &selected.id)
    }

    /// Re-bases the draft on the stored copy of the selected campaign.
    fn rebase(&mut self) {
        let Some(base) = self.selected.take() else {
            return;
        };
        let Some(remote) = self.campaigns.get(&base.id) else {
            tracing::info!(campaign_id = %base.id, "selected campaign deleted elsewhere, draft is now unsaved");
            self.delete_requested = false;
            return;
        };

        self.name = pick(&base.name, &self.name, &remote.name);
        if let Some(local) = &self.settings {
            self.settings = Some(pick(&base.settings, local, &remote.settings));
        }
        self.emails = self
            .emails
            .iter()
            .map(|local| {
                let base_email = base.emails.iter().find(|e| e.id == local.id);
                let remote_email = remote.emails.iter().find(|e| e.id == local.id);
                match (base_email, remote_email) {
                    (Some(b), Some(r)) => merge_email(b, local, r),
                    _ => local.clone(),
                }
            })
            .collect();

        tracing::debug!(campaign_id = %remote.id, "draft merged with stored campaign");
        self.selected = Some(remote);
    }
}

/// Keeps `local` if it differs from `base`, otherwise takes `remote`.
fn pick<T: PartialEq + Clone>(base: &T, local: &T, remote: &T) -> T {
    if local == base {
        remote.clone()
    } else {
        local.clone()
    }
}

fn merge_email(base: &EmailVariant, local: &EmailVariant, remote: &EmailVariant) -> EmailVariant {
    EmailVariant {
        id: local.id.clone(),
        subject: pick(&base.subject, &local.subject, &remote.subject),
        body: pick(&base.body, &local.body, &remote.body),
        ab_test: pick(&base.ab_test, &local.ab_test, &remote.ab_test),
        ab_subject: pick(&base.ab_subject, &local.ab_subject, &remote.ab_subject),
        ab_body: pick(&base.ab_body, &local.ab_body, &remote.ab_body),
        approval_status: pick(&base.approval_status, &local.approval_status, &remote.approval_status),
        ab_approval_status: pick(
            &base.ab_approval_status,
            &local.ab_approval_status,
            &remote.ab_approval_status,
        ),
    }
}
