use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use dropfront_core::DropId;
use dropfront_drops::countdown;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::session;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_drops))
        .route("/upcoming", get(upcoming_drops))
        .route("/live", get(live_drops))
        .route("/for-product/:product_id", get(drop_for_product))
        .route("/:id", get(get_drop))
        .route("/:id/access", get(check_access))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn list_drops(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        Some(s) => match dto::parse_drop_status(s) {
            Ok(s) => Some(s),
            Err(resp) => return resp,
        },
        None => None,
    };

    let now = Utc::now();
    let drops: Vec<_> = services
        .drops
        .list(status)
        .iter()
        .map(|d| dto::drop_to_json(d, countdown(now, d.launch_date)))
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "drops": drops }))).into_response()
}

pub async fn upcoming_drops(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let now = Utc::now();
    let drops: Vec<_> = services
        .drops
        .upcoming(now)
        .iter()
        .map(|d| dto::drop_to_json(d, countdown(now, d.launch_date)))
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "drops": drops }))).into_response()
}

pub async fn live_drops(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let now = Utc::now();
    let drops: Vec<_> = services
        .drops
        .live()
        .iter()
        .map(|d| dto::drop_to_json(d, countdown(now, d.launch_date)))
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "drops": drops }))).into_response()
}

/// The drop attached to a product's page, if any.
pub async fn drop_for_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: dropfront_core::ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.drops.drop_for_product(product_id) {
        Ok(drop) => {
            let now = Utc::now();
            (
                StatusCode::OK,
                Json(dto::drop_to_json(&drop, countdown(now, drop.launch_date))),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_drop(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let drop_id: DropId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid drop id")
        }
    };

    match services.drops.get(drop_id) {
        Ok(drop) => {
            let now = Utc::now();
            (
                StatusCode::OK,
                Json(dto::drop_to_json(&drop, countdown(now, drop.launch_date))),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Early-access gate: denies unless every condition holds.
pub async fn check_access(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    let drop_id: DropId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid drop id")
        }
    };
    let customer_id = match session::customer_from_headers(&headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.drops.check_early_access(drop_id, customer_id, Utc::now()) {
        Ok(granted) => (
            StatusCode::OK,
            Json(serde_json::json!({ "access": granted })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
