use std::sync::Arc;

use staffdir_auth::{Argon2Hasher, AuthenticationCoordinator, CredentialStore, TokenCodec};
use staffdir_directory::EmployeeRepository;
use staffdir_infra::{InMemoryCredentialStore, InMemoryEmployeeRepository};

use crate::config::{ApiConfig, ConfigError};

pub type Coordinator = AuthenticationCoordinator<Arc<dyn CredentialStore>, Argon2Hasher>;

/// Shared per-process services handed to handlers via `Extension`.
pub struct AppServices {
    pub auth: Coordinator,
    pub tokens: Arc<TokenCodec>,
    pub employees: Arc<dyn EmployeeRepository>,
}

pub fn build_services(config: &ApiConfig) -> Result<AppServices, ConfigError> {
    let cost = config.hash_cost;
    let hasher = Argon2Hasher::with_params(cost.memory_kib, cost.iterations, cost.parallelism)
        .map_err(|e| ConfigError::invalid("ARGON2_*", e))?;

    let credentials: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
    let employees: Arc<dyn EmployeeRepository> = Arc::new(InMemoryEmployeeRepository::new());

    tracing::info!(ttl_secs = config.token.ttl().num_seconds(), "services initialised");

    let auth = AuthenticationCoordinator::new(credentials, hasher)
        .map_err(|e| ConfigError::invalid("ARGON2_*", e))?;

    Ok(AppServices {
        auth,
        tokens: Arc::new(TokenCodec::new(&config.token)),
        employees,
    })
}
