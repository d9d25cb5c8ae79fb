//! Cart aggregate service.
//!
//! Invariant kept by every operation here: a session's reservations for a
//! variant sum to exactly that variant's line quantity. Add places a delta
//! hold; shrink gives back the newest holds first; remove/clear release
//! everything for the affected lines.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use dropfront_carts::{Cart, CartItem, CartTotals, calculate_totals};
use dropfront_core::{CartItemId, DomainError, DomainResult, SessionId, VariantId};
use dropfront_inventory::Reservation;

use crate::memory::TransactionalStore;
use crate::state::StoreState;

#[derive(Debug)]
pub struct CartService<S> {
    store: Arc<S>,
}

impl<S> Clone for CartService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: TransactionalStore> CartService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch the session's cart, creating an empty one (7-day expiry) if none
    /// exists yet.
    pub fn get_or_create(&self, session: &SessionId, now: DateTime<Utc>) -> DomainResult<Cart> {
        self.store.transaction(|state| {
            let cart = state
                .carts
                .entry(session.clone())
                .or_insert_with(|| Cart::new(session.clone(), now));
            Ok(cart.clone())
        })
    }

    /// Add `qty` units of a variant.
    ///
    /// An existing line gets its quantity increased and a fresh delta hold;
    /// the old hold keeps its original expiry. A new line snapshots the
    /// variant's effective price at this moment.
    pub fn add_item(
        &self,
        session: &SessionId,
        variant_id: VariantId,
        qty: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        if qty == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        self.store.transaction(|state| {
            let available = state.available(variant_id, now)?;
            if qty > available {
                return Err(DomainError::InsufficientInventory);
            }
            let price = state.unit_price(variant_id)?;

            let cart = state
                .carts
                .entry(session.clone())
                .or_insert_with(|| Cart::new(session.clone(), now));

            match cart.item_for_variant_mut(variant_id) {
                Some(item) => item.quantity += qty,
                None => cart.items.push(CartItem::new(variant_id, qty, price)),
            }

            let hold = Reservation::new(variant_id, qty, session.clone(), now);
            state.reservations.insert(hold.id, hold);

            debug!(session = %session, %variant_id, qty, "item added to cart");
            Ok(state.carts[session].clone())
        })
    }

    /// Set a line's quantity. Zero removes the line. Increases re-validate
    /// availability for the delta and place a delta hold; decreases give
    /// stock back. Neither path refreshes the expiry of existing holds.
    pub fn update_quantity(
        &self,
        session: &SessionId,
        item_id: CartItemId,
        qty: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        if qty == 0 {
            return self.remove_item(session, item_id);
        }

        self.store.transaction(|state| {
            let cart = state.carts.get_mut(session).ok_or(DomainError::ItemNotFound)?;
            let item = cart.item_mut(item_id).ok_or(DomainError::ItemNotFound)?;
            let variant_id = item.variant_id;
            let current = item.quantity;

            if qty > current {
                let delta = qty - current;
                // The line's own holds are part of "reserved", so only the
                // delta needs headroom.
                let available = state.available(variant_id, now)?;
                if delta > available {
                    return Err(DomainError::InsufficientInventory);
                }
                let hold = Reservation::new(variant_id, delta, session.clone(), now);
                state.reservations.insert(hold.id, hold);
            } else if qty < current {
                shrink_holds(state, session, variant_id, current - qty);
            }

            let cart = state.carts.get_mut(session).ok_or(DomainError::ItemNotFound)?;
            let item = cart.item_mut(item_id).ok_or(DomainError::ItemNotFound)?;
            item.quantity = qty;

            Ok(state.carts[session].clone())
        })
    }

    /// Remove a line and release all of its holds.
    pub fn remove_item(&self, session: &SessionId, item_id: CartItemId) -> DomainResult<Cart> {
        self.store.transaction(|state| {
            let cart = state.carts.get_mut(session).ok_or(DomainError::ItemNotFound)?;
            let removed = cart.remove_item(item_id).ok_or(DomainError::ItemNotFound)?;

            state
                .reservations
                .retain(|_, r| !(r.holder == *session && r.variant_id == removed.variant_id));

            debug!(session = %session, item = %item_id, "item removed from cart");
            Ok(state.carts[session].clone())
        })
    }

    /// Attach a discount code after validating it is currently redeemable.
    pub fn apply_discount(
        &self,
        session: &SessionId,
        code: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        let code = code.to_uppercase();
        self.store.transaction(|state| {
            let discount = state
                .discounts
                .get(&code)
                .ok_or_else(|| DomainError::invalid_discount("unknown code"))?;
            discount.validate(now)?;

            let cart = state
                .carts
                .entry(session.clone())
                .or_insert_with(|| Cart::new(session.clone(), now));
            cart.discount_code = Some(code.clone());
            Ok(cart.clone())
        })
    }

    pub fn remove_discount(&self, session: &SessionId, now: DateTime<Utc>) -> DomainResult<Cart> {
        self.store.transaction(|state| {
            let cart = state
                .carts
                .entry(session.clone())
                .or_insert_with(|| Cart::new(session.clone(), now));
            cart.discount_code = None;
            Ok(cart.clone())
        })
    }

    /// Totals from the snapshot prices. An empty or missing cart yields
    /// well-defined zeroes-plus-shipping; checkout enforces non-emptiness
    /// separately.
    pub fn calculate_totals(&self, session: &SessionId) -> CartTotals {
        self.store.read(|state| match state.carts.get(session) {
            Some(cart) => {
                let discount = cart
                    .discount_code
                    .as_deref()
                    .and_then(|code| state.discounts.get(code));
                calculate_totals(&cart.items, discount)
            }
            None => calculate_totals(&[], None),
        })
    }

    /// Drop every line and release every hold this session owns.
    pub fn clear_cart(&self, session: &SessionId, now: DateTime<Utc>) -> DomainResult<Cart> {
        self.store.transaction(|state| {
            let cart = state
                .carts
                .entry(session.clone())
                .or_insert_with(|| Cart::new(session.clone(), now));
            cart.items.clear();
            cart.discount_code = None;
            state.reservations.retain(|_, r| r.holder != *session);
            Ok(state.carts[session].clone())
        })
    }
}

/// Give back `excess` units of held stock, newest hold first: shrink one
/// reservation in place and delete any that are fully consumed.
fn shrink_holds(state: &mut StoreState, session: &SessionId, variant_id: VariantId, mut excess: u32) {
    for id in state.holds_for(session, variant_id) {
        if excess == 0 {
            break;
        }
        let Some(hold) = state.reservations.get_mut(&id) else {
            continue;
        };
        if hold.quantity <= excess {
            excess -= hold.quantity;
            state.reservations.remove(&id);
        } else {
            hold.quantity -= excess;
            excess = 0;
        }
    }
}
