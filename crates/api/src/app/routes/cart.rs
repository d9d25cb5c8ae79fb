use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;

use dropfront_carts::Cart;
use dropfront_core::CartItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::session::{self, SessionHandle};

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/:id", delete(remove_item).patch(update_item))
        .route("/discount", post(apply_discount).delete(remove_discount))
}

/// Cart + totals, minting the session cookie on first touch.
fn cart_response(
    services: &AppServices,
    handle: &SessionHandle,
    cart: &Cart,
) -> axum::response::Response {
    let totals = services.carts.calculate_totals(&handle.session);
    let response =
        (StatusCode::OK, Json(dto::cart_to_json(cart, &totals))).into_response();
    session::attach_session_cookie(response, handle)
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let handle = session::session_from_headers(&headers);
    match services.carts.get_or_create(&handle.session, Utc::now()) {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::AddItemRequest>,
) -> axum::response::Response {
    let handle = session::session_from_headers(&headers);
    match services
        .carts
        .add_item(&handle.session, body.variant_id, body.quantity, Utc::now())
    {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateQuantityRequest>,
) -> axum::response::Response {
    let item_id: CartItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id")
        }
    };

    let handle = session::session_from_headers(&headers);
    match services
        .carts
        .update_quantity(&handle.session, item_id, body.quantity, Utc::now())
    {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: CartItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id")
        }
    };

    let handle = session::session_from_headers(&headers);
    match services.carts.remove_item(&handle.session, item_id) {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn apply_discount(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::ApplyDiscountRequest>,
) -> axum::response::Response {
    let handle = session::session_from_headers(&headers);
    match services
        .carts
        .apply_discount(&handle.session, &body.code, Utc::now())
    {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_discount(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let handle = session::session_from_headers(&headers);
    match services.carts.remove_discount(&handle.session, Utc::now()) {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let handle = session::session_from_headers(&headers);
    match services.carts.clear_cart(&handle.session, Utc::now()) {
        Ok(cart) => cart_response(&services, &handle, &cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}
