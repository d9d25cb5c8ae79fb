//! The persisted tables, as one cloneable value.
//!
//! A transaction works on a private copy of this struct; commit swaps it in,
//! abort drops it. Helpers here are the read patterns the services share.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use dropfront_carts::{Cart, Discount};
use dropfront_catalog::{Product, Variant};
use dropfront_checkout::Order;
use dropfront_core::{
    CustomerId, DomainError, DomainResult, DropId, Money, OrderId, ProductId, ReservationId,
    SessionId, VariantId,
};
use dropfront_drops::Drop;
use dropfront_inventory::{Reservation, available, reserved_quantity};

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub products: HashMap<ProductId, Product>,
    pub variants: HashMap<VariantId, Variant>,
    pub reservations: HashMap<ReservationId, Reservation>,
    /// One cart per session.
    pub carts: HashMap<SessionId, Cart>,
    pub orders: HashMap<OrderId, Order>,
    /// Keyed by upper-cased code.
    pub discounts: HashMap<String, Discount>,
    pub drops: HashMap<DropId, Drop>,
}

impl StoreState {
    pub fn variant(&self, id: VariantId) -> DomainResult<&Variant> {
        self.variants.get(&id).ok_or(DomainError::VariantNotFound)
    }

    pub fn variant_mut(&mut self, id: VariantId) -> DomainResult<&mut Variant> {
        self.variants.get_mut(&id).ok_or(DomainError::VariantNotFound)
    }

    pub fn product(&self, id: ProductId) -> DomainResult<&Product> {
        self.products.get(&id).ok_or(DomainError::NotFound)
    }

    /// Active held quantity against one variant.
    pub fn reserved_for(&self, variant_id: VariantId, now: DateTime<Utc>) -> u32 {
        reserved_quantity(self.reservations.values(), variant_id, now)
    }

    /// `stock − Σ(active reservations)`, clamped at zero.
    pub fn available(&self, variant_id: VariantId, now: DateTime<Utc>) -> DomainResult<u32> {
        let variant = self.variant(variant_id)?;
        Ok(available(variant.stock, self.reserved_for(variant_id, now)))
    }

    /// Effective unit price of a variant: product base plus adjustment.
    pub fn unit_price(&self, variant_id: VariantId) -> DomainResult<Money> {
        let variant = self.variant(variant_id)?;
        let product = self.product(variant.product_id)?;
        Ok(variant.price(product.base_price))
    }

    /// Sum of on-hand stock across all of a product's variants.
    pub fn total_stock(&self, product_id: ProductId) -> u32 {
        self.variants
            .values()
            .filter(|v| v.product_id == product_id)
            .map(|v| v.stock)
            .sum()
    }

    pub fn order_number_taken(&self, order_number: &str) -> bool {
        self.orders.values().any(|o| o.order_number == order_number)
    }

    pub fn orders_for_customer(&self, customer_id: CustomerId) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .values()
            .filter(|o| o.customer_id == Some(customer_id))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// This session's reservation ids for one variant, newest hold first.
    /// Quantity shrinks give back the most recently claimed stock.
    pub fn holds_for(&self, holder: &SessionId, variant_id: VariantId) -> Vec<ReservationId> {
        let mut holds: Vec<&Reservation> = self
            .reservations
            .values()
            .filter(|r| r.holder == *holder && r.variant_id == variant_id)
            .collect();
        holds.sort_by(|a, b| b.expires_at.cmp(&a.expires_at));
        holds.into_iter().map(|r| r.id).collect()
    }
}
