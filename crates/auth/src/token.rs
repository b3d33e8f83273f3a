//! Compact signed bearer tokens (HS256 JWT).
//!
//! The codec is pure: issuing and verifying never touch IO or a clock, the
//! caller passes `now`. The signing key is fixed at construction.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{JwtClaims, Role};

/// HS256 keys shorter than the hash output are rejected.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token subject does not match")]
    SubjectMismatch,

    #[error("signing key too short: {0} bytes (need at least {MIN_SECRET_LEN})")]
    WeakKey(usize),

    #[error("token lifetime must be positive")]
    InvalidTtl,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Outcome of verifying a token for a given subject at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid,
    Expired,
    BadSignature,
    Malformed,
    SubjectMismatch,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        matches!(self, Verification::Valid)
    }
}

/// Immutable token settings, loaded once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakKey(secret.len()));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl);
        }
        Ok(Self { secret, ttl })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl core::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Token verification seam used by request middleware.
pub trait JwtValidator: Send + Sync {
    /// Signature- and structure-checked claims. Expiry is not checked here.
    fn decode(&self, token: &str) -> Result<JwtClaims, TokenError>;

    fn verify(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> Verification;

    fn parse_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Boolean gate: every failure mode collapses to `false`.
    fn is_valid(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        self.verify(token, expected_subject, now).is_valid()
    }
}

/// HS256 token codec.
#[derive(Clone)]
pub struct TokenCodec {
    ttl: Duration,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is judged against the caller's `now`, not the library clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            ttl: config.ttl,
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            validation,
        }
    }

    /// Mint a token for `subject` carrying `roles` in the given order.
    pub fn issue(
        &self,
        subject: &str,
        roles: &[Role],
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = JwtClaims::new(subject, roles.to_vec(), now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Tagged verification result; see [`JwtValidator::is_valid`] for the boolean gate.
    pub fn check(
        &self,
        token: &str,
        expected_subject: &str,
        now: DateTime<Utc>,
    ) -> Result<JwtClaims, TokenError> {
        let claims = self.decode_claims(token)?;
        if claims.sub != expected_subject {
            return Err(TokenError::SubjectMismatch);
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn decode_claims(&self, token: &str) -> Result<JwtClaims, TokenError> {
        jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtValidator for TokenCodec {
    fn decode(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.decode_claims(token)
    }

    fn verify(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> Verification {
        match self.check(token, expected_subject, now) {
            Ok(_) => Verification::Valid,
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                match e {
                    TokenError::Expired => Verification::Expired,
                    TokenError::BadSignature => Verification::BadSignature,
                    TokenError::SubjectMismatch => Verification::SubjectMismatch,
                    _ => Verification::Malformed,
                }
            }
        }
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        other => TokenError::Malformed(format!("{other:?}")),
    }
}
