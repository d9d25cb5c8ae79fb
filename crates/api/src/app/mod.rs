//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store + service construction shared by every handler
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `sweep_secret` guards the scheduler and admin surfaces via a bearer token.
pub fn build_app(sweep_secret: String) -> Router {
    let auth_state = middleware::SweepAuthState {
        secret: Arc::new(sweep_secret),
    };

    let services = Arc::new(services::AppServices::build());

    // Storefront routes: session-scoped, no credential required.
    let storefront = routes::router();

    // Admin + scheduler routes: bearer secret required.
    let guarded = Router::new()
        .nest("/admin", routes::admin::router())
        .nest("/cron", routes::cron::router())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::sweep_auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(storefront)
        .merge(guarded)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
