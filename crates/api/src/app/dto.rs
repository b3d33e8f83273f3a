use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use staffdir_auth::Role;

use crate::app::errors;

/// Body for `/auth/register` and `/auth/login`. `role` is ignored on login.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub username: String,
    pub roles: Vec<Role>,
}

/// Absent or blank means "default role".
pub fn parse_requested_role(raw: Option<&str>) -> Result<Vec<Role>, axum::response::Response> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(Vec::new()),
        Some(name) => name
            .parse::<Role>()
            .map(|role| vec![role])
            .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_role", e.to_string())),
    }
}
