use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dropfront_core::{DomainError, DomainResult, Money, ProductId, VariantId};

/// Catalog product. Pricing lives on the product; per-variant deltas are
/// expressed as a signed adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub base_price: Money,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, base_price: Money, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if base_price.is_negative() {
            return Err(DomainError::validation("base price cannot be negative"));
        }
        let slug = slugify(&name);
        Ok(Self {
            id: ProductId::new(),
            name,
            slug,
            base_price,
            created_at: now,
        })
    }
}

/// A specific purchasable size/color combination of a product.
///
/// `stock` is the on-hand count; availability (stock minus active holds) is
/// computed by the inventory ledger, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: String,
    pub color: String,
    /// Signed delta on the product's base price, in cents.
    pub price_adjustment: Money,
    pub stock: u32,
    pub low_stock_threshold: u32,
}

impl Variant {
    /// Effective unit price: product base plus this variant's adjustment.
    pub fn price(&self, base_price: Money) -> Money {
        base_price + self.price_adjustment
    }

    pub fn stock_status(&self) -> StockStatus {
        stock_status(self.stock, self.low_stock_threshold)
    }
}

/// Display-level stock classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// Classify an on-hand count against a low-stock threshold.
pub fn stock_status(stock: u32, low_stock_threshold: u32) -> StockStatus {
    if stock == 0 {
        StockStatus::OutOfStock
    } else if stock <= low_stock_threshold {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// URL-safe slug: lowercase alphanumerics joined by single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if (c.is_whitespace() || c == '-') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
