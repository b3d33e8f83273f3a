use chrono::{DateTime, Utc};

use crate::{AccessDecision, AccessRequirement, AuthzError, JwtValidator, Operation, Role, authorize};

/// Authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<Role>,
}

/// Per-request authentication state.
///
/// `Unauthenticated` denies every requirement; `Authenticated` defers to
/// [`authorize`] over the token's roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAuth {
    Unauthenticated,
    Authenticated(Principal),
}

impl RequestAuth {
    /// Resolve a presented bearer token (if any) into a request state.
    pub fn from_token(
        validator: &dyn JwtValidator,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(token) = token else {
            return RequestAuth::Unauthenticated;
        };

        let claims = match validator.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected");
                return RequestAuth::Unauthenticated;
            }
        };

        // Signature already checked by `decode`; only expiry remains.
        if claims.is_expired_at(now) {
            tracing::debug!(subject = %claims.sub, "bearer token expired");
            return RequestAuth::Unauthenticated;
        }

        RequestAuth::Authenticated(Principal {
            subject: claims.sub,
            roles: claims.roles,
        })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            RequestAuth::Authenticated(p) => Some(p),
            RequestAuth::Unauthenticated => None,
        }
    }

    pub fn decide(&self, requirement: &AccessRequirement) -> AccessDecision {
        match self {
            RequestAuth::Unauthenticated => AccessDecision::Deny,
            RequestAuth::Authenticated(p) => authorize(&p.roles, requirement),
        }
    }

    /// Gate a named operation, reporting why it was refused.
    pub fn ensure(&self, operation: Operation) -> Result<(), AuthzError> {
        let requirement = operation.requirement();
        match self.decide(&requirement) {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny if self.principal().is_none() => Err(AuthzError::Unauthenticated),
            AccessDecision::Deny => Err(AuthzError::Forbidden(
                operation.name(),
                requirement.roles().to_vec(),
            )),
        }
    }
}
