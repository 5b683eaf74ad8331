//! Domain layer: records, identifiers, the approval state machine, and
//! the change-notification bus.
//!
//! Everything here is storage-agnostic. Stores in [`crate::service`]
//! persist these types; controllers in [`crate::controller`] edit copies
//! of them.

pub mod approval;
pub mod campaign;
pub mod campaign_event;
pub mod client;
pub mod email;
pub mod event_bus;
pub mod ids;
pub mod theme;
pub mod user;
pub mod view_mode;

pub use approval::{ApprovalStatus, CampaignProgress, combined_status};
pub use campaign::{Campaign, CampaignSettings, EmailType, IntentLevel, remove_email};
pub use campaign_event::CampaignEvent;
pub use client::{Client, NewClient, seed_clients};
pub use email::{EmailEdit, EmailVariant, Variant};
pub use event_bus::EventBus;
pub use ids::{CampaignId, ClientId};
pub use theme::Theme;
pub use user::{Credentials, Role, User};
pub use view_mode::ViewMode;
