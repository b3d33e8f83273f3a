use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Password hashing is CPU-bound, so both handlers run the coordinator on
/// the blocking pool.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::AuthRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let roles = match dto::parse_requested_role(body.role.as_deref()) {
        Ok(roles) => roles,
        Err(resp) => return resp,
    };

    let result = tokio::task::spawn_blocking(move || {
        services.auth.register(&body.username, &body.password, &roles)
    })
    .await;

    match result {
        Ok(Ok(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(Err(e)) => errors::auth_error_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "registration task failed");
            errors::internal()
        }
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::AuthRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let worker = services.clone();
    let username = body.username.clone();
    let result = tokio::task::spawn_blocking(move || {
        worker.auth.authenticate(&body.username, &body.password)
    })
    .await;

    let credential = match result {
        Ok(Ok(credential)) => credential,
        Ok(Err(e)) => {
            if e.is_credentials_failure() {
                tracing::warn!(username = %username, "login rejected");
            }
            return errors::auth_error_to_response(e);
        }
        Err(e) => {
            tracing::error!(error = %e, "login task failed");
            return errors::internal();
        }
    };

    match services.tokens.issue(&credential.username, &credential.roles, Utc::now()) {
        Ok(token) => {
            tracing::info!(username = %credential.username, "login succeeded");
            (StatusCode::OK, Json(dto::TokenResponse { token })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::internal()
        }
    }
}
