//! `staffdir-auth`: credential registration, password verification, signed
//! bearer tokens and role-based access decisions.
//!
//! This crate is decoupled from HTTP and storage: persistence is reached
//! through the [`CredentialStore`] trait and transport through plain strings.

pub mod authorize;
pub mod claims;
pub mod coordinator;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{AccessDecision, AccessRequirement, AuthzError, Operation, authorize};
pub use claims::JwtClaims;
pub use coordinator::{AuthError, AuthenticationCoordinator};
pub use password::{Argon2Hasher, PasswordError, PasswordHasher};
pub use principal::{Principal, RequestAuth};
pub use roles::{Role, UnknownRole};
pub use token::{JwtValidator, TokenCodec, TokenConfig, TokenError, Verification};
pub use user::{CredentialStore, NewCredential, StoreError, TokenSubject, UserCredential, UserView};
