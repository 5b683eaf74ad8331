//! Service layer: the persistent stores.
//!
//! Each store wraps the shared [`crate::storage::KeyValueStore`] and owns
//! one key. [`CampaignStore`] additionally publishes change notifications
//! through the [`crate::domain::EventBus`].

pub mod campaign_store;
pub mod credential_store;
pub mod report;
pub mod session_store;
pub mod theme_store;

pub use campaign_store::CampaignStore;
pub use credential_store::CredentialStore;
pub use report::WorkspaceReport;
pub use session_store::SessionStore;
pub use theme_store::ThemeStore;
