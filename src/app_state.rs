//! Shared application state injected into every view controller.
//!
//! Replaces process-wide globals: the session, theme and stores are built
//! once from [`ReviewConfig`] and handed to whoever needs them.

use std::sync::Arc;

use crate::config::ReviewConfig;
use crate::domain::{Credentials, EventBus};
use crate::error::ReviewError;
use crate::service::{CampaignStore, CredentialStore, SessionStore, ThemeStore};
use crate::storage::{self, KeyValueStore};

/// Bundle of stores sharing one storage backend and one event bus.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Agency credential and client accounts.
    pub credentials: CredentialStore,
    /// Current logged-in user.
    pub sessions: SessionStore,
    /// Campaign list.
    pub campaigns: CampaignStore,
    /// Theme preference.
    pub themes: ThemeStore,
    /// Change notifications for campaign writes.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds every store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, config: &ReviewConfig) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let credentials = CredentialStore::new(
            Arc::clone(&storage),
            Credentials::new(config.agency_username.clone(), config.agency_password.clone()),
        );
        let sessions = SessionStore::new(Arc::clone(&storage), credentials.clone());
        let campaigns = CampaignStore::new(Arc::clone(&storage), event_bus.clone());
        let themes = ThemeStore::new(storage, config.system_theme);

        Self {
            credentials,
            sessions,
            campaigns,
            themes,
            event_bus,
        }
    }

    /// Opens the configured storage backend and builds every store over it.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the backend cannot be opened.
    pub fn from_config(config: &ReviewConfig) -> Result<Self, ReviewError> {
        let storage = storage::open(config)?;
        Ok(Self::new(storage, config))
    }
}
