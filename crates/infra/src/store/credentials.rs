use std::collections::HashMap;
use std::sync::RwLock;

use staffdir_auth::{CredentialStore, NewCredential, StoreError, UserCredential};
use staffdir_core::UserId;

#[derive(Default)]
struct Tables {
    by_id: HashMap<UserId, UserCredential>,
    id_by_username: HashMap<String, UserId>,
}

/// In-memory credential store with a unique index on `username`.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Tables>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|t| t.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("credential store lock poisoned".to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables.id_by_username.contains_key(username))
    }

    fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .id_by_username
            .get(username)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    fn save(&self, credential: NewCredential) -> Result<UserCredential, StoreError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        if tables.id_by_username.contains_key(&credential.username) {
            return Err(StoreError::DuplicateKey(format!(
                "username '{}'",
                credential.username
            )));
        }

        let stored = UserCredential {
            id: UserId::new(),
            username: credential.username,
            password_hash: credential.password_hash,
            roles: credential.roles,
        };
        tables
            .id_by_username
            .insert(stored.username.clone(), stored.id);
        tables.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(&self, credential: UserCredential) -> Result<UserCredential, StoreError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        let existing = tables.by_id.get(&credential.id).ok_or(StoreError::NotFound)?;

        if existing.username != credential.username {
            tracing::warn!(user_id = %credential.id, "rejected username change on update");
            return Err(StoreError::Backend("username is immutable".to_string()));
        }

        tables.by_id.insert(credential.id, credential.clone());
        Ok(credential)
    }
}
