//! Credential store: the static agency login plus the client accounts.
//!
//! Passwords are stored and compared as plain text. Deleting a client
//! leaves its campaigns in place; their `client_id` then references a
//! username no client owns, and every view must tolerate that.

use std::fmt;
use std::sync::Arc;

use crate::domain::{Client, ClientId, Credentials, NewClient, Role, User, seed_clients};
use crate::error::ReviewError;
use crate::storage::{self, CLIENTS_KEY, KeyValueStore};

/// Authenticates users and manages the persisted client list.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
    agency: Credentials,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("storage", &self.storage)
            .field("agency_username", &self.agency.username)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a store over `storage` with the given agency credential.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, agency: Credentials) -> Self {
        Self { storage, agency }
    }

    /// Checks `credentials` against the agency login, then every client.
    ///
    /// Returns `None` on mismatch. The returned username is the stored
    /// spelling, not the one typed.
    pub fn authenticate(&self, credentials: &Credentials) -> Option<User> {
        if credentials.matches(&self.agency.username, &self.agency.password) {
            return Some(User {
                username: self.agency.username.clone(),
                role: Role::Agency,
            });
        }

        self.list_clients()
            .into_iter()
            .find(|c| credentials.matches(&c.username, &c.password))
            .map(|c| User {
                username: c.username,
                role: Role::Client,
            })
    }

    /// Returns every client in insertion order.
    ///
    /// Falls back to the built-in seed clients when nothing is stored or
    /// the stored list is unreadable.
    pub fn list_clients(&self) -> Vec<Client> {
        match storage::read_json::<Vec<Client>>(self.storage.as_ref(), CLIENTS_KEY) {
            Ok(Some(clients)) => clients,
            Ok(None) => seed_clients(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load clients, using seed clients");
                seed_clients()
            }
        }
    }

    /// Returns the client with the given ID.
    pub fn find_client(&self, client_id: &ClientId) -> Option<Client> {
        self.list_clients().into_iter().find(|c| &c.id == client_id)
    }

    /// Registers a new client with a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if any field is empty, or a
    /// storage error if the list could not be persisted.
    pub fn add_client(&self, input: NewClient) -> Result<Client, ReviewError> {
        input.validate()?;
        let client = input.into_client();

        let mut clients = self.list_clients();
        clients.push(client.clone());
        self.persist(&clients)?;

        tracing::info!(client_id = %client.id, username = %client.username, "client added");
        Ok(client)
    }

    /// Replaces the stored client with the same ID. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the list could not be persisted.
    pub fn update_client(&self, client: &Client) -> Result<(), ReviewError> {
        let mut clients = self.list_clients();
        let Some(existing) = clients.iter_mut().find(|c| c.id == client.id) else {
            tracing::debug!(client_id = %client.id, "update ignored, client not found");
            return Ok(());
        };
        *existing = client.clone();
        self.persist(&clients)?;

        tracing::info!(client_id = %client.id, "client updated");
        Ok(())
    }

    /// Sets a new password for a client. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if the trimmed password is
    /// empty, or a storage error if the list could not be persisted.
    pub fn reset_password(&self, client_id: &ClientId, password: &str) -> Result<(), ReviewError> {
        let password = password.trim();
        if password.is_empty() {
            return Err(ReviewError::Validation(
                "new password must not be empty".to_string(),
            ));
        }
        match self.find_client(client_id) {
            Some(client) => self.update_client(&Client {
                password: password.to_string(),
                ..client
            }),
            None => Ok(()),
        }
    }

    /// Removes a client. Unknown IDs are ignored; campaigns are untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the list could not be persisted.
    pub fn delete_client(&self, client_id: &ClientId) -> Result<(), ReviewError> {
        let mut clients = self.list_clients();
        let before = clients.len();
        clients.retain(|c| &c.id != client_id);
        if clients.len() == before {
            tracing::debug!(%client_id, "delete ignored, client not found");
            return Ok(());
        }
        self.persist(&clients)?;

        tracing::info!(%client_id, "client deleted");
        Ok(())
    }

    fn persist(&self, clients: &[Client]) -> Result<(), ReviewError> {
        storage::write_json(self.storage.as_ref(), CLIENTS_KEY, clients).inspect_err(|e| {
            tracing::error!(error = %e, "failed to persist clients");
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tokio_test::{assert_err, assert_ok};

    fn make_store() -> (Arc<MemoryStore>, CredentialStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = CredentialStore::new(
            Arc::clone(&backend) as Arc<dyn KeyValueStore>,
            Credentials::new("BizyPro", "BizyPro1$!"),
        );
        (backend, store)
    }

    fn acme() -> NewClient {
        NewClient {
            name: "Acme".to_string(),
            username: "ops@acme.test".to_string(),
            password: "Acme1$!".to_string(),
        }
    }

    #[test]
    fn agency_login_ignores_username_case() {
        let (_, store) = make_store();
        let user = store.authenticate(&Credentials::new("bizypro", "BizyPro1$!"));
        assert_eq!(
            user,
            Some(User {
                username: "BizyPro".to_string(),
                role: Role::Agency
            })
        );
    }

    #[test]
    fn agency_password_is_exact() {
        let (_, store) = make_store();
        assert!(
            store
                .authenticate(&Credentials::new("BizyPro", "bizypro1$!"))
                .is_none()
        );
    }

    #[test]
    fn seed_client_can_log_in() {
        let (_, store) = make_store();
        let Some(user) = store.authenticate(&Credentials::new("Kai@HabitualHerbs.com", "Herbs1$!"))
        else {
            panic!("seed client should authenticate");
        };
        assert_eq!(user.username, "kai@habitualherbs.com");
        assert_eq!(user.role, Role::Client);
    }

    #[test]
    fn corrupt_client_list_falls_back_to_seeds() {
        let (backend, store) = make_store();
        assert_ok!(backend.set(CLIENTS_KEY, "not json"));
        assert_eq!(store.list_clients(), seed_clients());
    }

    #[test]
    fn added_client_is_appended_and_can_log_in() {
        let (_, store) = make_store();
        let client = assert_ok!(store.add_client(acme()));

        let clients = store.list_clients();
        assert_eq!(clients.len(), 3);
        assert_eq!(clients.last(), Some(&client));
        assert!(
            store
                .authenticate(&Credentials::new("ops@acme.test", "Acme1$!"))
                .is_some()
        );
    }

    #[test]
    fn add_client_rejects_empty_fields() {
        let (_, store) = make_store();
        let err = assert_err!(store.add_client(NewClient {
            password: String::new(),
            ..acme()
        }));
        assert!(matches!(err, ReviewError::Validation(_)));
        assert_eq!(store.list_clients().len(), 2);
    }

    #[test]
    fn reset_password_replaces_credential() {
        let (_, store) = make_store();
        let herbs = ClientId::from("herbs");
        assert_ok!(store.reset_password(&herbs, "  Fresh1$!  "));

        assert!(
            store
                .authenticate(&Credentials::new("kai@habitualherbs.com", "Herbs1$!"))
                .is_none()
        );
        assert!(
            store
                .authenticate(&Credentials::new("kai@habitualherbs.com", "Fresh1$!"))
                .is_some()
        );
        assert_err!(store.reset_password(&herbs, "   "));
    }

    #[test]
    fn update_and_delete_of_unknown_id_are_no_ops() {
        let (backend, store) = make_store();
        let ghost = Client {
            id: ClientId::from("ghost"),
            name: "Ghost".to_string(),
            username: "ghost@test".to_string(),
            password: "x".to_string(),
        };
        assert_ok!(store.update_client(&ghost));
        assert_ok!(store.delete_client(&ghost.id));
        assert_eq!(assert_ok!(backend.get(CLIENTS_KEY)), None);
    }

    #[test]
    fn delete_client_removes_login() {
        let (_, store) = make_store();
        assert_ok!(store.delete_client(&ClientId::from("bayshore")));

        assert_eq!(store.list_clients().len(), 1);
        assert!(store.find_client(&ClientId::from("bayshore")).is_none());
        assert!(
            store
                .authenticate(&Credentials::new("billing@bayshoreplumbers.com", "Bayshore1$!"))
                .is_none()
        );
    }

    #[test]
    fn debug_does_not_leak_agency_password() {
        let (_, store) = make_store();
        let debug = format!("{store:?}");
        assert!(debug.contains("BizyPro"));
        assert!(!debug.contains("BizyPro1$!"));
    }
}
