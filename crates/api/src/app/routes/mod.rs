use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod employees;
pub mod system;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(system::whoami))
        .nest("/employees", employees::router())
}
