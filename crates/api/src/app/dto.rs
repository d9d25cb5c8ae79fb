use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use dropfront_carts::{Cart, CartTotals, DiscountKind};
use dropfront_catalog::Variant;
use dropfront_checkout::{Order, ShippingAddress};
use dropfront_core::{Money, ProductId, VariantId};
use dropfront_drops::{Countdown, Drop, DropStatus, EarlyAccessRule};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub sku: String,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub price_adjustment_cents: i64,
    pub stock: u32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
}

fn default_low_stock_threshold() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub base_price_cents: i64,
    pub variants: Vec<VariantRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    pub code: String,
    #[serde(flatten)]
    pub kind: DiscountKind,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub variant_id: VariantId,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApplyDiscountRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub payment_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDropRequest {
    pub product_id: ProductId,
    pub launch_date: DateTime<Utc>,
    pub early_access_date: Option<DateTime<Utc>>,
    pub early_access_rule: Option<EarlyAccessRule>,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Money goes over the wire as integer cents.
fn cents(m: Money) -> i64 {
    m.cents()
}

pub fn variant_to_json(variant: &Variant, base_price: Money, available: u32) -> serde_json::Value {
    serde_json::json!({
        "id": variant.id.to_string(),
        "sku": variant.sku,
        "size": variant.size,
        "color": variant.color,
        "price_cents": cents(variant.price(base_price)),
        "stock_status": variant.stock_status(),
        "available": available,
    })
}

pub fn totals_to_json(totals: &CartTotals) -> serde_json::Value {
    serde_json::json!({
        "subtotal_cents": cents(totals.subtotal),
        "discount_cents": cents(totals.discount),
        "shipping_cents": cents(totals.shipping),
        "tax_cents": cents(totals.tax),
        "total_cents": cents(totals.total),
    })
}

pub fn cart_to_json(cart: &Cart, totals: &CartTotals) -> serde_json::Value {
    serde_json::json!({
        "items": cart.items.iter().map(|item| serde_json::json!({
            "id": item.id.to_string(),
            "variant_id": item.variant_id.to_string(),
            "quantity": item.quantity,
            "price_cents": cents(item.price),
            "line_total_cents": cents(item.line_total()),
        })).collect::<Vec<_>>(),
        "discount_code": cart.discount_code,
        "expires_at": cart.expires_at.to_rfc3339(),
        "totals": totals_to_json(totals),
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.id.to_string(),
        "order_number": order.order_number,
        "customer_id": order.customer_id.map(|c| c.to_string()),
        "email": order.email,
        "status": order.status,
        "totals": totals_to_json(&order.totals),
        "shipping_address": order.shipping_address,
        "payment_reference": order.payment_reference,
        "items": order.items.iter().map(|item| serde_json::json!({
            "variant_id": item.variant_id.to_string(),
            "quantity": item.quantity,
            "price_cents": cents(item.price),
        })).collect::<Vec<_>>(),
        "created_at": order.created_at.to_rfc3339(),
    })
}

pub fn drop_to_json(drop: &Drop, countdown: Countdown) -> serde_json::Value {
    serde_json::json!({
        "id": drop.id.to_string(),
        "product_id": drop.product_id.to_string(),
        "launch_date": drop.launch_date.to_rfc3339(),
        "early_access_date": drop.early_access_date.map(|d| d.to_rfc3339()),
        "early_access_rule": drop.early_access_rule,
        "status": drop.status,
        "countdown": countdown,
    })
}

pub fn parse_drop_status(s: &str) -> Result<DropStatus, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "scheduled" => Ok(DropStatus::Scheduled),
        "early_access" => Ok(DropStatus::EarlyAccess),
        "live" => Ok(DropStatus::Live),
        "sold_out" => Ok(DropStatus::SoldOut),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: scheduled, early_access, live, sold_out",
        )),
    }
}
