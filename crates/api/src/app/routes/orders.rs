use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dropfront_core::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::session;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/number/:number", get(get_order_by_number))
}

/// The identified customer's order history, newest first.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let customer_id = match session::customer_from_headers(&headers) {
        Ok(Some(c)) => c,
        Ok(None) => {
            return errors::json_error(
                StatusCode::FORBIDDEN,
                "unauthorized",
                "customer identity required",
            )
        }
        Err(resp) => return resp,
    };

    let orders: Vec<_> = services
        .checkout
        .orders_for_customer(customer_id)
        .iter()
        .map(dto::order_to_json)
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "orders": orders }))).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };
    let customer_id = match session::customer_from_headers(&headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.checkout.get_order(order_id, customer_id) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Confirmation-page lookup by human-facing order number.
pub async fn get_order_by_number(
    Extension(services): Extension<Arc<AppServices>>,
    Path(number): Path<String>,
) -> axum::response::Response {
    match services.checkout.get_order_by_number(&number) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
