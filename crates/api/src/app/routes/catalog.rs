use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use dropfront_core::{ProductId, VariantId};
use dropfront_store::TransactionalStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products/:id", get(get_product))
        .route("/variants/:id", get(get_variant))
}

/// Product with its variants, live availability included.
pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let product = match services.catalog.product(product_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let now = Utc::now();
    let variants = services.store.read(|state| {
        let mut variants: Vec<_> = state
            .variants
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect();
        variants.sort_by(|a, b| a.sku.cmp(&b.sku));
        variants
            .into_iter()
            .map(|v| {
                let available = state.available(v.id, now).unwrap_or(0);
                dto::variant_to_json(&v, product.base_price, available)
            })
            .collect::<Vec<_>>()
    });

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "id": product.id.to_string(),
            "name": product.name,
            "slug": product.slug,
            "base_price_cents": product.base_price.cents(),
            "variants": variants,
        })),
    )
        .into_response()
}

pub async fn get_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let variant_id: VariantId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")
        }
    };

    let variant = match services.catalog.variant(variant_id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let product = match services.catalog.product(variant.product_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let available = match services.ledger.available(variant_id, Utc::now()) {
        Ok(n) => n,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(dto::variant_to_json(&variant, product.base_price, available)),
    )
        .into_response()
}
