//! Theme preference store.

use std::sync::Arc;

use crate::domain::Theme;
use crate::error::ReviewError;
use crate::storage::{KeyValueStore, THEME_KEY};

/// Persists the light/dark preference as a bare string.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    system_preference: Theme,
}

impl ThemeStore {
    /// Creates a store that falls back to `system_preference`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, system_preference: Theme) -> Self {
        Self {
            storage,
            system_preference,
        }
    }

    /// Returns the stored theme, or the system preference if none (or an
    /// unrecognised value) is stored.
    pub fn get(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or(self.system_preference),
            Ok(None) => self.system_preference,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load theme, using system preference");
                self.system_preference
            }
        }
    }

    /// Stores `theme` as the preference.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the preference could not be written.
    pub fn set(&self, theme: Theme) -> Result<(), ReviewError> {
        self.storage.set(THEME_KEY, theme.as_str())?;
        tracing::debug!(%theme, "theme set");
        Ok(())
    }

    /// Flips the current theme, stores it, and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the preference could not be written.
    pub fn toggle(&self) -> Result<Theme, ReviewError> {
        let next = self.get().toggled();
        self.set(next)?;
        Ok(next)
    }
}
