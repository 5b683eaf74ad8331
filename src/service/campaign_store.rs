//! Campaign store: CRUD over the persisted campaign list.
//!
//! The store is the single source of truth for campaigns. Views read
//! copies, edit them locally, and write them back through [`CampaignStore::save`]
//! or [`CampaignStore::save_all`]. Every successful write publishes a
//! [`CampaignEvent`] so concurrently open views can refresh.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::domain::{Campaign, CampaignEvent, CampaignId, EventBus};
use crate::error::ReviewError;
use crate::storage::{self, CAMPAIGNS_KEY, KeyValueStore};

/// Persisted, insertion-ordered list of campaigns.
///
/// There is no locking across writers: two views saving concurrently race
/// and the last write wins.
#[derive(Debug, Clone)]
pub struct CampaignStore {
    storage: Arc<dyn KeyValueStore>,
    event_bus: EventBus,
}

impl CampaignStore {
    /// Creates a store over `storage` that publishes to `event_bus`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, event_bus: EventBus) -> Self {
        Self { storage, event_bus }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Registers for change notifications on every future write.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CampaignEvent> {
        self.event_bus.subscribe()
    }

    /// Returns every campaign in insertion order.
    ///
    /// Never fails: unreadable or corrupt storage is logged and reads as
    /// an empty list.
    pub fn list(&self) -> Vec<Campaign> {
        match storage::read_json::<Vec<Campaign>>(self.storage.as_ref(), CAMPAIGNS_KEY) {
            Ok(campaigns) => campaigns.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load campaigns, using empty list");
                Vec::new()
            }
        }
    }

    /// Returns the campaigns assigned to `client_username`, in insertion order.
    pub fn list_for_client(&self, client_username: &str) -> Vec<Campaign> {
        self.list()
            .into_iter()
            .filter(|c| c.belongs_to(client_username))
            .collect()
    }

    /// Returns the campaign with the given ID.
    pub fn get(&self, campaign_id: &CampaignId) -> Option<Campaign> {
        self.list().into_iter().find(|c| &c.id == campaign_id)
    }

    /// Inserts `campaign`, or replaces the stored campaign with the same ID.
    ///
    /// `updated_at` is always refreshed. `created_at` is set on first save
    /// and carried over from the stored copy afterwards. Returns the copy
    /// as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] or [`ReviewError::Serialization`]
    /// if the list could not be persisted; no event is published then.
    pub fn save(&self, mut campaign: Campaign) -> Result<Campaign, ReviewError> {
        let mut campaigns = self.list();
        let now = Utc::now();
        campaign.updated_at = now;

        let created = match campaigns.iter_mut().find(|c| c.id == campaign.id) {
            Some(existing) => {
                campaign.created_at = existing.created_at;
                *existing = campaign.clone();
                false
            }
            None => {
                campaign.created_at = now;
                campaigns.push(campaign.clone());
                true
            }
        };

        self.persist(&campaigns)?;

        let _ = self.event_bus.publish(CampaignEvent::CampaignSaved {
            campaign_id: campaign.id.clone(),
            client_id: campaign.settings.client_id.clone(),
            created,
            timestamp: now,
        });

        tracing::info!(campaign_id = %campaign.id, created, "campaign saved");
        Ok(campaign)
    }

    /// Removes the campaign with the given ID.
    ///
    /// Returns `false` without writing or notifying if no such campaign
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] or [`ReviewError::Serialization`]
    /// if the shortened list could not be persisted.
    pub fn delete(&self, campaign_id: &CampaignId) -> Result<bool, ReviewError> {
        let mut campaigns = self.list();
        let before = campaigns.len();
        campaigns.retain(|c| &c.id != campaign_id);
        if campaigns.len() == before {
            tracing::debug!(%campaign_id, "delete ignored, campaign not found");
            return Ok(false);
        }

        self.persist(&campaigns)?;

        let _ = self.event_bus.publish(CampaignEvent::CampaignDeleted {
            campaign_id: campaign_id.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(%campaign_id, "campaign deleted");
        Ok(true)
    }

    /// Replaces the whole stored list in a single write.
    ///
    /// Timestamps are stored exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] or [`ReviewError::Serialization`]
    /// if the list could not be persisted.
    pub fn save_all(&self, campaigns: &[Campaign]) -> Result<(), ReviewError> {
        self.persist(campaigns)?;

        let _ = self.event_bus.publish(CampaignEvent::CampaignsReplaced {
            count: campaigns.len(),
            timestamp: Utc::now(),
        });

        tracing::info!(count = campaigns.len(), "campaign list replaced");
        Ok(())
    }

    fn persist(&self, campaigns: &[Campaign]) -> Result<(), ReviewError> {
        storage::write_json(self.storage.as_ref(), CAMPAIGNS_KEY, campaigns).inspect_err(|e| {
            tracing::error!(error = %e, "failed to persist campaigns");
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ApprovalStatus, CampaignSettings, EmailType, IntentLevel};
    use crate::storage::MemoryStore;
    use crate::storage::memory::FullStore;
    use chrono::{DateTime, TimeZone};
    use tokio_test::{assert_err, assert_ok};

    fn make_store() -> CampaignStore {
        CampaignStore::new(Arc::new(MemoryStore::new()), EventBus::new(64))
    }

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn campaign_for(client: &str, emails: u32) -> Campaign {
        let settings = CampaignSettings {
            email_type: EmailType::B2C,
            intent_level: IntentLevel::Low,
            number_of_emails: emails,
            client_id: client.to_string(),
            client_name: client.to_string(),
        };
        let emails = settings.blank_emails();
        Campaign::new(CampaignId::generate(), "Test".to_string(), settings, emails)
    }

    #[test]
    fn empty_storage_lists_nothing() {
        assert!(make_store().list().is_empty());
    }

    #[test]
    fn corrupt_storage_degrades_to_empty() {
        let backend = Arc::new(MemoryStore::new());
        assert_ok!(backend.set(CAMPAIGNS_KEY, "[{\"id\":"));
        let store = CampaignStore::new(backend, EventBus::new(8));
        assert!(store.list().is_empty());
    }

    #[test]
    fn save_is_idempotent_on_id() {
        let store = make_store();
        let campaign = campaign_for("a@test", 2);
        assert_ok!(store.save(campaign.clone()));
        assert_ok!(store.save(campaign.clone()));

        let stored = store.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.first().map(|c| &c.id), Some(&campaign.id));
    }

    #[test]
    fn save_appends_in_insertion_order() {
        let store = make_store();
        let first = campaign_for("a@test", 1);
        let second = campaign_for("b@test", 1);
        assert_ok!(store.save(first.clone()));
        assert_ok!(store.save(second.clone()));
        assert_ok!(store.save(first.clone()));

        let ids: Vec<_> = store.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn resave_preserves_created_at_and_refreshes_updated_at() {
        let store = make_store();
        let saved = assert_ok!(store.save(campaign_for("a@test", 1)));

        let mut edited = saved.clone();
        edited.name = "Renamed".to_string();
        edited.created_at = long_ago();
        edited.updated_at = long_ago();
        let resaved = assert_ok!(store.save(edited));

        assert_eq!(resaved.created_at, saved.created_at);
        assert_ne!(resaved.updated_at, long_ago());

        let Some(stored) = store.get(&saved.id) else {
            panic!("campaign should be stored");
        };
        assert_eq!(stored, resaved);
        assert_eq!(stored.name, "Renamed");
    }

    #[test]
    fn list_for_client_filters_and_keeps_order() {
        let store = make_store();
        let a1 = campaign_for("a@test", 1);
        let b1 = campaign_for("b@test", 1);
        let a2 = campaign_for("a@test", 3);
        for c in [&a1, &b1, &a2] {
            assert_ok!(store.save(c.clone()));
        }

        let ids: Vec<_> = store
            .list_for_client("a@test")
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![a1.id, a2.id]);
        assert!(store.list_for_client("A@TEST").is_empty());
    }

    #[test]
    fn delete_removes_only_matching() {
        let store = make_store();
        let keep = campaign_for("a@test", 1);
        let gone = campaign_for("a@test", 1);
        assert_ok!(store.save(keep.clone()));
        assert_ok!(store.save(gone.clone()));

        assert!(assert_ok!(store.delete(&gone.id)));
        assert!(store.get(&gone.id).is_none());
        assert!(store.get(&keep.id).is_some());
    }

    #[test]
    fn delete_missing_is_a_silent_no_op() {
        let store = make_store();
        let mut rx = store.subscribe();
        assert!(!assert_ok!(store.delete(&CampaignId::from("campaign-missing"))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn save_all_replaces_list_verbatim() {
        let store = make_store();
        assert_ok!(store.save(campaign_for("a@test", 1)));

        let mut replacement = campaign_for("b@test", 2);
        replacement.updated_at = long_ago();
        if let Some(email) = replacement.emails.first_mut() {
            email.approval_status = ApprovalStatus::Denied;
        }
        assert_ok!(store.save_all(std::slice::from_ref(&replacement)));

        assert_eq!(store.list(), vec![replacement]);
    }

    #[tokio::test]
    async fn writes_notify_subscribers() {
        let store = make_store();
        let mut rx = store.subscribe();

        let campaign = assert_ok!(store.save(campaign_for("a@test", 1)));
        let Ok(event) = rx.recv().await else {
            panic!("expected save event");
        };
        assert!(matches!(
            event,
            CampaignEvent::CampaignSaved { created: true, ref client_id, .. } if client_id == "a@test"
        ));

        assert_ok!(store.delete(&campaign.id));
        let Ok(event) = rx.recv().await else {
            panic!("expected delete event");
        };
        assert_eq!(event.event_type_str(), "campaign_deleted");
        assert_eq!(event.campaign_id(), Some(&campaign.id));

        assert_ok!(store.save_all(&[]));
        let Ok(event) = rx.recv().await else {
            panic!("expected replace event");
        };
        assert!(matches!(event, CampaignEvent::CampaignsReplaced { count: 0, .. }));
    }

    #[test]
    fn failed_write_surfaces_error_without_notifying() {
        let store = CampaignStore::new(Arc::new(FullStore::default()), EventBus::new(8));
        let mut rx = store.subscribe();

        let err = assert_err!(store.save(campaign_for("a@test", 1)));
        assert!(matches!(err, ReviewError::Storage(_)));
        assert!(rx.try_recv().is_err());
        assert!(store.list().is_empty());
    }
}
