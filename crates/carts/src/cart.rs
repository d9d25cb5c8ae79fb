use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use dropfront_core::{CartItemId, Money, SessionId, VariantId};

/// How long an untouched cart survives before it may be discarded.
pub const CART_TTL_DAYS: i64 = 7;

pub fn cart_ttl() -> Duration {
    Duration::days(CART_TTL_DAYS)
}

/// A pending line: variant, quantity, and the unit price snapshotted at
/// add-time. Lines are never re-priced against the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub variant_id: VariantId,
    pub quantity: u32,
    pub price: Money,
}

impl CartItem {
    pub fn new(variant_id: VariantId, quantity: u32, price: Money) -> Self {
        Self {
            id: CartItemId::new(),
            variant_id,
            quantity,
            price,
        }
    }

    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// Session-scoped mutable collection of pending line items.
///
/// Every unit of quantity in here is backed by a ledger reservation held by
/// the same session; the store services keep the two in lockstep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub session: SessionId,
    pub expires_at: DateTime<Utc>,
    pub discount_code: Option<String>,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(session: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session,
            expires_at: now + cart_ttl(),
            discount_code: None,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: CartItemId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub fn item_for_variant_mut(&mut self, variant_id: VariantId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.variant_id == variant_id)
    }

    pub fn remove_item(&mut self, item_id: CartItemId) -> Option<CartItem> {
        let idx = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cart_gets_seven_day_expiry() {
        let now = Utc::now();
        let cart = Cart::new(SessionId::new("session_x"), now);
        assert_eq!(cart.expires_at, now + Duration::days(7));
        assert!(cart.is_empty());
        assert!(cart.discount_code.is_none());
    }

    #[test]
    fn line_total_multiplies_snapshot_price() {
        let item = CartItem::new(VariantId::new(), 3, Money::from_cents(2550));
        assert_eq!(item.line_total(), Money::from_cents(7650));
    }

    #[test]
    fn remove_item_returns_the_removed_line() {
        let now = Utc::now();
        let mut cart = Cart::new(SessionId::new("session_x"), now);
        let item = CartItem::new(VariantId::new(), 1, Money::from_dollars(20));
        let id = item.id;
        cart.items.push(item);

        let removed = cart.remove_item(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(cart.is_empty());
        assert!(cart.remove_item(id).is_none());
    }
}
