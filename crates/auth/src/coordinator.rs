//! Registration and login orchestration over a credential store and a hasher.

use thiserror::Error;

use crate::{
    CredentialStore, NewCredential, PasswordError, PasswordHasher, Role, StoreError, TokenSubject,
    UserCredential, UserView,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("username already taken")]
    UsernameTaken,

    #[error("user not found")]
    UserNotFound,

    #[error("bad credentials")]
    BadCredentials,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error("credential store failure: {0}")]
    Store(String),
}

impl AuthError {
    /// Login failures that must look identical to the caller.
    pub fn is_credentials_failure(&self) -> bool {
        matches!(self, AuthError::UserNotFound | AuthError::BadCredentials)
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(_) => AuthError::UsernameTaken,
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Backend(msg) => AuthError::Store(msg),
        }
    }
}

/// Orchestrates registration and authentication.
///
/// Does not issue tokens: callers hand the authenticated subject to a
/// [`crate::TokenCodec`].
pub struct AuthenticationCoordinator<S, H> {
    store: S,
    hasher: H,
    /// Verified against when the username is unknown, so both login
    /// failures pay the same hashing cost.
    dummy_hash: String,
}

impl<S, H> AuthenticationCoordinator<S, H>
where
    S: CredentialStore,
    H: PasswordHasher,
{
    pub fn new(store: S, hasher: H) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash("staffdir-unknown-user")?;
        Ok(Self {
            store,
            hasher,
            dummy_hash,
        })
    }

    /// Register a new user.
    ///
    /// Empty `requested_roles` means the default role. The existence check is
    /// advisory; a concurrent registration losing the race surfaces from the
    /// store as a duplicate key and is reported the same way.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        requested_roles: &[Role],
    ) -> Result<UserView, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("username must not be blank".into()));
        }
        if password.trim().is_empty() {
            return Err(AuthError::Validation("password must not be blank".into()));
        }

        if self.store.exists_by_username(username)? {
            tracing::info!(username, "registration rejected: username taken");
            return Err(AuthError::UsernameTaken);
        }

        let roles = if requested_roles.is_empty() {
            vec![Role::default()]
        } else {
            Role::dedup(requested_roles.iter().copied())
        };

        let password_hash = self.hasher.hash(password)?;
        let saved = self
            .store
            .save(NewCredential {
                username: username.to_string(),
                password_hash,
                roles,
            })
            .map_err(|e| {
                if matches!(e, StoreError::DuplicateKey(_)) {
                    tracing::warn!(username, "registration lost a uniqueness race");
                }
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %saved.id, username, roles = ?saved.roles, "user registered");
        Ok(saved.public_view())
    }

    /// Check a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<UserCredential, AuthError> {
        let Some(credential) = self.store.find_by_username(username)? else {
            self.hasher.verify(password, &self.dummy_hash);
            return Err(AuthError::UserNotFound);
        };

        if !self.hasher.verify(password, &credential.password_hash) {
            return Err(AuthError::BadCredentials);
        }

        Ok(credential)
    }

    /// Subject and roles for building token claims.
    pub fn load_for_token(&self, username: &str) -> Result<TokenSubject, AuthError> {
        self.store
            .find_by_username(username)?
            .map(|c| c.token_subject())
            .ok_or(AuthError::UserNotFound)
    }
}
