//! Stored user credentials and the store contract the coordinator depends on.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use staffdir_core::UserId;

use crate::Role;

/// A stored user credential.
///
/// # Invariants
/// - `username` is unique and case-exact; it never changes after creation.
/// - `password_hash` is opaque and only ever handed to a [`crate::PasswordHasher`].
/// - `roles` is non-empty once registered and keeps grant order.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl UserCredential {
    /// Projection safe to return across the API boundary (no hash).
    pub fn public_view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }

    pub fn token_subject(&self) -> TokenSubject {
        TokenSubject {
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }
}

impl core::fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserCredential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// A credential not yet persisted; the store assigns its id.
#[derive(Clone)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
}

/// What a token is minted from: subject plus granted roles, in grant order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub username: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique constraint on `username` rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("record not found")]
    NotFound,

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Durable user records keyed by unique username.
///
/// Implementations must enforce username uniqueness atomically inside
/// `save`/`update`; callers treat [`StoreError::DuplicateKey`] as the
/// authoritative conflict signal regardless of any earlier existence check.
pub trait CredentialStore: Send + Sync {
    fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;

    fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>, StoreError>;

    /// Insert a new record, assigning its id.
    fn save(&self, credential: NewCredential) -> Result<UserCredential, StoreError>;

    /// Replace an existing record (matched by id).
    fn update(&self, credential: UserCredential) -> Result<UserCredential, StoreError>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        (**self).exists_by_username(username)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>, StoreError> {
        (**self).find_by_username(username)
    }

    fn save(&self, credential: NewCredential) -> Result<UserCredential, StoreError> {
        (**self).save(credential)
    }

    fn update(&self, credential: UserCredential) -> Result<UserCredential, StoreError> {
        (**self).update(credential)
    }
}
