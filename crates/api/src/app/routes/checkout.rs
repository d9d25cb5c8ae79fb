use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use dropfront_store::CheckoutRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::session;

pub fn router() -> Router {
    Router::new().route("/", post(commit))
}

/// Convert the cart into an order: one transaction, all or nothing.
pub async fn commit(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::CheckoutBody>,
) -> axum::response::Response {
    let customer_id = match session::customer_from_headers(&headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let handle = session::session_from_headers(&headers);

    let request = CheckoutRequest {
        session: handle.session.clone(),
        email: body.email,
        shipping_address: body.shipping_address,
        payment_reference: body.payment_reference,
        customer_id,
    };

    match services.checkout.commit(request, Utc::now()) {
        Ok(order) => {
            let response =
                (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response();
            session::attach_session_cookie(response, &handle)
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
