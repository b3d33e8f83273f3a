//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, hasher and token codec wiring
//! - `routes/`: HTTP handlers (one file per area)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::{ApiConfig, ConfigError};
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Result<Router, ConfigError> {
    let services = Arc::new(services::build_services(config)?);
    let auth_state = middleware::AuthState {
        jwt: services.tokens.clone(),
        services: services.clone(),
    };

    // Protected routes: a valid bearer token resolving to a live account.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services))))
}
