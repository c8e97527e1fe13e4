//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborator wiring (buses, grid, forms, flashes)
//! - `orchestrator.rs`: the product admin actions
//! - `routes/`: HTTP handlers, one thin function per action
//! - `respond.rs`: admin responses to HTTP responses
//! - `dto.rs`, `forms.rs`: request parsing and form binding
//! - `errors.rs`: the user-facing error message table and JSON errors

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use backoffice_auth::{Hs256JwtValidator, JwtValidator};

use crate::config::ServerConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod flash;
pub mod forms;
pub mod orchestrator;
pub mod respond;
pub mod routes;
pub mod services;
pub mod translation;
pub mod view;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ServerConfig) -> Result<Router, services::BootstrapError> {
    let jwt: Arc<dyn JwtValidator> = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let services = Arc::new(services::build_demo_services(config)?);
    Ok(build_router(services, jwt))
}

/// Router over already-built services; tests use this to swap collaborators.
pub fn build_router(services: Arc<AppServices>, jwt: Arc<dyn JwtValidator>) -> Router {
    let auth_state = middleware::AuthState { jwt };

    // Layers run bottom-up: auth first, then the admin context, then the handler.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            services,
            middleware::admin_context_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub use services::AppServices;
