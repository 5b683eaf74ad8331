//! View mode threaded through email editing.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Role;

/// Which persona a view renders for.
///
/// Agency views edit content and never review; client views review and
/// never edit content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Editable subject/body/A-B fields, no approval controls.
    Agency,
    /// Read-only content with approve/deny controls.
    Client,
}

impl ViewMode {
    /// Returns `true` if content fields are editable in this mode.
    #[must_use]
    pub const fn can_edit_content(&self) -> bool {
        matches!(self, Self::Agency)
    }

    /// Returns `true` if approval status can be changed in this mode.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        matches!(self, Self::Client)
    }
}

impl From<Role> for ViewMode {
    fn from(role: Role) -> Self {
        match role {
            Role::Agency => Self::Agency,
            Role::Client => Self::Client,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agency => f.write_str("agency"),
            Self::Client => f.write_str("client"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_are_disjoint() {
        assert!(ViewMode::Agency.can_edit_content());
        assert!(!ViewMode::Agency.can_review());
        assert!(ViewMode::Client.can_review());
        assert!(!ViewMode::Client.can_edit_content());
    }

    #[test]
    fn role_maps_to_mode() {
        assert_eq!(ViewMode::from(Role::Client), ViewMode::Client);
    }
}
