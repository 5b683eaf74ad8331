//! Review error types with stable numeric codes.
//!
//! [`ReviewError`] is the central error type for the crate. Each variant
//! maps to a numeric code and to one [`ErrorCategory`], so callers can
//! decide how to degrade without matching on every variant.

use serde::Serialize;

use crate::domain::{CampaignId, Role, ViewMode};

/// Broad error family a [`ReviewError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad form input or an edit the current view may not perform.
    Validation,
    /// Credential mismatch or missing/insufficient session.
    Auth,
    /// The referenced record does not exist.
    NotFound,
    /// Persistent storage is corrupt or unavailable.
    Storage,
}

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category              |
/// |-----------|-----------------------|
/// | 1000–1999 | Validation            |
/// | 2000–2999 | Auth / Not Found      |
/// | 3000–3999 | Storage / Internal    |
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Form input failed validation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A field was edited from a view that renders it read-only.
    #[error("{field} is read-only in {mode} view")]
    ReadOnly {
        /// Name of the rejected field.
        field: &'static str,
        /// View mode the edit was attempted from.
        mode: ViewMode,
    },

    /// Email index outside the campaign's email list.
    #[error("email {index} out of range ({len} emails)")]
    EmailOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of emails.
        len: usize,
    },

    /// Username/password pair did not match any credential.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No user is logged in.
    #[error("not logged in")]
    NotLoggedIn,

    /// The logged-in user has the wrong role for the requested view.
    #[error("requires {expected} role, session is {actual}")]
    WrongRole {
        /// Role the view requires.
        expected: Role,
        /// Role of the current session.
        actual: Role,
    },

    /// Campaign with the given ID was not found.
    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored JSON could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReviewError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::ReadOnly { .. } => 1002,
            Self::EmailOutOfRange { .. } => 1003,
            Self::InvalidCredentials => 2001,
            Self::NotLoggedIn => 2002,
            Self::WrongRole { .. } => 2003,
            Self::CampaignNotFound(_) => 2101,
            Self::Storage(_) => 3001,
            Self::Serialization(_) => 3002,
        }
    }

    /// Returns the category this variant belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::ReadOnly { .. } | Self::EmailOutOfRange { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidCredentials | Self::NotLoggedIn | Self::WrongRole { .. } => {
                ErrorCategory::Auth
            }
            Self::CampaignNotFound(_) => ErrorCategory::NotFound,
            Self::Storage(_) | Self::Serialization(_) => ErrorCategory::Storage,
        }
    }
}

impl From<std::io::Error> for ReviewError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
