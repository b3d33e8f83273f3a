use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use staffdir_auth::{JwtValidator, RequestAuth};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub services: Arc<AppServices>,
}

/// Resolve the bearer token into a [`PrincipalContext`].
///
/// Every failure (no header, bad token, account gone) is a 403 with the same
/// body; the cause is only logged.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth = RequestAuth::from_token(state.jwt.as_ref(), extract_bearer(req.headers()), Utc::now());

    let RequestAuth::Authenticated(principal) = auth else {
        return errors::forbidden();
    };

    if let Err(e) = state.services.auth.load_for_token(&principal.subject) {
        tracing::debug!(username = %principal.subject, error = %e, "token subject no longer resolvable");
        return errors::forbidden();
    }

    req.extensions_mut().insert(PrincipalContext::from(principal));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
