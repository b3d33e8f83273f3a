//! Process configuration, read once at startup.

use std::net::SocketAddr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Duration;
use thiserror::Error;

use staffdir_auth::{TokenConfig, TokenError};
use staffdir_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MS: i64 = 3_600_000;
const DEV_SECRET: &[u8] = b"staffdir-insecure-development-signing-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub token: TokenConfig,
    pub hash_cost: HashCost,
    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Read `BIND_ADDR`, `JWT_SECRET` (base64), `JWT_EXPIRATION_MS`,
    /// `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS`, `ARGON2_PARALLELISM` and
    /// `LOG_FORMAT` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", e))?;

        let secret = match lookup("JWT_SECRET") {
            Some(encoded) => STANDARD
                .decode(encoded.trim())
                .map_err(|e| ConfigError::invalid("JWT_SECRET", e))?,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_SECRET.to_vec()
            }
        };

        let ttl_ms = match lookup("JWT_EXPIRATION_MS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::invalid("JWT_EXPIRATION_MS", e))?,
            None => DEFAULT_TOKEN_TTL_MS,
        };
        let token = TokenConfig::new(secret, Duration::milliseconds(ttl_ms))?;

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_u32(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_u32(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_u32(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        let log_format = lookup("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            token,
            hash_cost,
            log_format,
        })
    }
}

fn parse_u32(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::invalid(name, e)),
        None => Ok(default),
    }
}
