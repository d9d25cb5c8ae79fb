use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use chrono::Utc;

use dropfront_carts::Discount;
use dropfront_checkout::OrderStatus;
use dropfront_core::{Money, OrderId, VariantId};
use dropfront_store::VariantSpec;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/discounts", post(create_discount))
        .route("/drops", post(create_drop))
        .route("/variants/:id/restock", post(restock))
        .route("/orders/:id/status", patch(update_order_status))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let variants = body
        .variants
        .into_iter()
        .map(|v| VariantSpec {
            sku: v.sku,
            size: v.size,
            color: v.color,
            price_adjustment: Money::from_cents(v.price_adjustment_cents),
            stock: v.stock,
            low_stock_threshold: v.low_stock_threshold,
        })
        .collect();

    match services.catalog.create_product(
        &body.name,
        Money::from_cents(body.base_price_cents),
        variants,
        Utc::now(),
    ) {
        Ok((product, variants)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": product.id.to_string(),
                "slug": product.slug,
                "variants": variants.iter().map(|v| serde_json::json!({
                    "id": v.id.to_string(),
                    "sku": v.sku,
                })).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_discount(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateDiscountRequest>,
) -> axum::response::Response {
    let mut discount = Discount::new(body.code, body.kind);
    discount.expires_at = body.expires_at;
    discount.usage_limit = body.usage_limit;

    match services.catalog.create_discount(discount) {
        Ok(discount) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "code": discount.code })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_drop(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateDropRequest>,
) -> axum::response::Response {
    match services.drops.create_drop(
        body.product_id,
        body.launch_date,
        body.early_access_date,
        body.early_access_rule,
    ) {
        Ok(drop) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": drop.id.to_string(),
                "status": drop.status,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RestockRequest>,
) -> axum::response::Response {
    let variant_id: VariantId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")
        }
    };

    match services.ledger.add(variant_id, body.quantity) {
        Ok(stock) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": variant_id.to_string(),
                "stock": stock,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };
    let status: OrderStatus = match body.status.parse() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.checkout.update_status(order_id, status) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
