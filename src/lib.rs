//! # campaign-review
//!
//! Drafting and client approval of multi-email marketing campaigns.
//!
//! An agency user drafts campaigns (a sequence of emails, each with an
//! optional A/B alternative) for a client. The client logs in, sees only
//! the campaigns assigned to them, and approves or denies each email.
//! Every write lands in a key-value store and is announced on an event
//! bus, so open views of the same data stay in sync.
//!
//! ## Architecture
//!
//! ```text
//! Views (editor, reviewer)
//!     │
//!     ├── CampaignEditor / CampaignReviewer (controller/)
//!     │
//!     ├── Credential / Session / Campaign / Theme stores (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Approval rules, Campaign, EmailVariant (domain/)
//!     │
//!     └── KeyValueStore: JSON files or memory (storage/)
//! ```

pub mod app_state;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
