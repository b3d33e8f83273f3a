use axum::{Extension, Json, http::StatusCode};

use crate::app::dto::WhoAmI;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<WhoAmI> {
    Json(WhoAmI {
        username: principal.username().to_string(),
        roles: principal.roles().to_vec(),
    })
}
