//! HTTP API for the registration server.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{admin_auth_middleware, check_basic_auth, logging_middleware};
pub use types::*;

use crate::store::RegistrationStore;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use secrecy::SecretString;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Default request body limit; signatures travel inline as base64.
pub const DEFAULT_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration storage
    pub store: RegistrationStore,
    /// Shared administrator PIN
    pub admin_pin: Arc<SecretString>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: RegistrationStore, admin_pin: SecretString) -> Self {
        Self {
            store,
            admin_pin: Arc::new(admin_pin),
        }
    }
}

/// Create the API router with the default body limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Create the API router with a custom body limit.
pub fn create_router_with_body_limit(state: AppState, body_limit: usize) -> Router {
    // Administrator endpoints (Basic auth against the shared PIN)
    let admin = Router::new()
        .route(
            "/api/registrations",
            get(handlers::list_registrations).delete(handlers::clear_registrations),
        )
        .route("/api/export", get(handlers::export_registrations))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        // Liveness probe
        .route("/api/ping", get(handlers::ping))
        // Student submissions (no auth)
        .route("/api/register", post(handlers::register))
        .merge(admin)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
