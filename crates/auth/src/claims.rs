use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::Role;

/// JWT claims sealed inside a bearer token.
///
/// Timestamps travel as whole seconds (`iat`/`exp`), so they are truncated
/// at construction to keep the in-memory value equal to the decoded one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated username.
    pub sub: String,

    /// Granted roles, in the order the principal holds them.
    pub roles: Vec<Role>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    pub fn new(
        subject: impl Into<String>,
        roles: Vec<Role>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.into(),
            roles,
            issued_at: whole_seconds(now),
            expires_at: whole_seconds(now + ttl),
        }
    }

    /// Expired at or after `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

fn whole_seconds(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_nanosecond(0).unwrap_or(t)
}
