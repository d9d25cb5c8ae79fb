//! Scheduler endpoints, invoked externally on a timer. Both sweeps are
//! idempotent, so overlapping or repeated invocations are harmless.

use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/cleanup-reservations", post(cleanup_reservations))
        .route("/activate-drops", post(activate_drops))
}

/// Delete reservations whose hold has lapsed.
pub async fn cleanup_reservations(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.reaper.sweep(Utc::now()) {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({ "removed": removed })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Advance drop statuses: clock-driven activation plus the stock-driven
/// sold-out pass.
pub async fn activate_drops(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let now = Utc::now();

    let outcome = match services.drops.activate_drops(now) {
        Ok(o) => o,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let sold_out = match services.drops.mark_sold_out(now) {
        Ok(n) => n,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "activated": outcome.activated,
            "early_access": outcome.early_access,
            "sold_out": sold_out,
        })),
    )
        .into_response()
}
