use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use staffdir_auth::AuthError;
use staffdir_directory::DirectoryError;

const INVALID_CREDENTIALS: &str = "invalid username or password";

pub fn auth_error_to_response(err: AuthError) -> Response {
    match err {
        AuthError::UsernameTaken => {
            json_error(StatusCode::CONFLICT, "username_taken", "username already exists")
        }
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        // One response for both so callers cannot probe for usernames.
        AuthError::UserNotFound | AuthError::BadCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", INVALID_CREDENTIALS)
        }
        AuthError::Hashing(e) => {
            tracing::error!(error = %e, "password hashing failed");
            internal()
        }
        AuthError::Store(msg) => {
            tracing::error!(error = %msg, "credential store failure");
            internal()
        }
    }
}

pub fn directory_error_to_response(err: DirectoryError) -> Response {
    match err {
        DirectoryError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "employee not found"),
        DirectoryError::DuplicateEmail(email) => json_error(
            StatusCode::CONFLICT,
            "duplicate_email",
            format!("email already in use: {email}"),
        ),
        DirectoryError::Invalid(e) => json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        DirectoryError::Backend(msg) => {
            tracing::error!(error = %msg, "employee store failure");
            internal()
        }
    }
}

/// Unreadable or mistyped request bodies, in the same JSON error shape.
pub fn json_rejection(rejection: JsonRejection) -> Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub fn forbidden() -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "access denied")
}

pub fn internal() -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
