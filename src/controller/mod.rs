//! View controllers: the agency editor and the client reviewer.
//!
//! Controllers hold copies of campaigns, edit them under an explicit
//! [`crate::domain::ViewMode`], and write back through the stores.
//! Form widgets, routing and rendering sit outside this crate and feed
//! controllers their events.

pub mod editor;
pub mod reviewer;
pub mod settings_form;

pub use editor::{CampaignEditor, UNTITLED};
pub use reviewer::CampaignReviewer;
pub use settings_form::{MAX_EMAILS, SettingsForm};
