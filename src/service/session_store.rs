//! Session store: the currently logged-in user.
//!
//! A session is a bare username/role pair persisted under the session
//! key. It never expires and carries no token; logging out removes it.

use std::sync::Arc;

use super::CredentialStore;
use crate::domain::{Credentials, Role, User};
use crate::error::ReviewError;
use crate::storage::{self, KeyValueStore, SESSION_KEY};

/// Persists the current user and guards role-specific views.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    credentials: CredentialStore,
}

impl SessionStore {
    /// Creates a session store that authenticates against `credentials`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, credentials: CredentialStore) -> Self {
        Self {
            storage,
            credentials,
        }
    }

    /// Authenticates and, on success, makes the user the current session.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidCredentials`] on mismatch, or a
    /// storage error if the session could not be persisted.
    pub fn login(&self, credentials: &Credentials) -> Result<User, ReviewError> {
        let Some(user) = self.credentials.authenticate(credentials) else {
            tracing::info!(username = %credentials.username, "login rejected");
            return Err(ReviewError::InvalidCredentials);
        };
        self.set_current_user(Some(&user))?;
        tracing::info!(username = %user.username, role = %user.role, "logged in");
        Ok(user)
    }

    /// Returns the logged-in user, if any.
    ///
    /// An unreadable session is logged and treated as logged out.
    pub fn current_user(&self) -> Option<User> {
        storage::read_json(self.storage.as_ref(), SESSION_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load session, treating as logged out");
            None
        })
    }

    /// Persists `user` as the session, or clears it when `None`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session could not be written.
    pub fn set_current_user(&self, user: Option<&User>) -> Result<(), ReviewError> {
        let result = match user {
            Some(user) => storage::write_json(self.storage.as_ref(), SESSION_KEY, user),
            None => self.storage.remove(SESSION_KEY),
        };
        result.inspect_err(|e| tracing::error!(error = %e, "failed to persist session"))
    }

    /// Clears the session.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session could not be removed.
    pub fn logout(&self) -> Result<(), ReviewError> {
        self.set_current_user(None)?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Returns the current user if it may open a view requiring `role`.
    ///
    /// With `role == None` any logged-in user passes.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::NotLoggedIn`] without a session, or
    /// [`ReviewError::WrongRole`] if the session has a different role.
    pub fn require(&self, role: Option<Role>) -> Result<User, ReviewError> {
        let user = self.current_user().ok_or(ReviewError::NotLoggedIn)?;
        match role {
            Some(expected) if expected != user.role => Err(ReviewError::WrongRole {
                expected,
                actual: user.role,
            }),
            _ => Ok(user),
        }
    }
}
