//! Thin catalog-management collaborator: just enough writes to stand up
//! products, variants, and discount codes for the core to operate on.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use dropfront_carts::Discount;
use dropfront_catalog::{Product, Variant};
use dropfront_core::{DomainError, DomainResult, Money, ProductId, VariantId};

use crate::memory::TransactionalStore;

/// What a new variant looks like before it gets an id.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    pub sku: String,
    pub size: String,
    pub color: String,
    pub price_adjustment: Money,
    pub stock: u32,
    pub low_stock_threshold: u32,
}

#[derive(Debug)]
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: TransactionalStore> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create_product(
        &self,
        name: &str,
        base_price: Money,
        variants: Vec<VariantSpec>,
        now: DateTime<Utc>,
    ) -> DomainResult<(Product, Vec<Variant>)> {
        self.store.transaction(|state| {
            let product = Product::new(name, base_price, now)?;
            let product_id = product.id;

            let mut created = Vec::with_capacity(variants.len());
            for spec in &variants {
                if spec.sku.trim().is_empty() {
                    return Err(DomainError::validation("variant sku is required"));
                }
                let variant = Variant {
                    id: VariantId::new(),
                    product_id,
                    sku: spec.sku.clone(),
                    size: spec.size.clone(),
                    color: spec.color.clone(),
                    price_adjustment: spec.price_adjustment,
                    stock: spec.stock,
                    low_stock_threshold: spec.low_stock_threshold,
                };
                state.variants.insert(variant.id, variant.clone());
                created.push(variant);
            }

            state.products.insert(product_id, product.clone());
            Ok((product, created))
        })
    }

    pub fn create_discount(&self, discount: Discount) -> DomainResult<Discount> {
        self.store.transaction(|state| {
            if state.discounts.contains_key(&discount.code) {
                return Err(DomainError::validation("discount code already exists"));
            }
            state.discounts.insert(discount.code.clone(), discount.clone());
            Ok(discount.clone())
        })
    }

    pub fn variant(&self, variant_id: VariantId) -> DomainResult<Variant> {
        self.store.read(|state| state.variant(variant_id).cloned())
    }

    pub fn product(&self, product_id: ProductId) -> DomainResult<Product> {
        self.store.read(|state| state.product(product_id).cloned())
    }
}
