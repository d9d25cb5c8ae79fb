//! Checkout orchestrator: cart → durable order, exactly once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use dropfront_carts::calculate_totals;
use dropfront_checkout::{Order, OrderItem, OrderStatus, ShippingAddress, generate_order_number};
use dropfront_core::{CustomerId, DomainError, DomainResult, OrderId, SessionId};

use crate::memory::TransactionalStore;
use crate::state::StoreState;

/// Attempts at minting a unique order number before giving up. The random
/// suffix makes even a second round unlikely.
const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Everything checkout needs besides the clock. The payment reference is an
/// external confirmation token, recorded verbatim and never validated here.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub session: SessionId,
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub payment_reference: String,
    pub customer_id: Option<CustomerId>,
}

#[derive(Debug)]
pub struct CheckoutService<S> {
    store: Arc<S>,
}

impl<S> Clone for CheckoutService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: TransactionalStore> CheckoutService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Convert the session's cart into an order, in one transaction:
    /// re-validate stock per line, freeze totals and lines, deduct stock,
    /// count discount usage, and clear the cart plus its holds. Any failure
    /// rolls the whole thing back: no partial order, no partial deduction.
    pub fn commit(&self, request: CheckoutRequest, now: DateTime<Utc>) -> DomainResult<Order> {
        request.shipping_address.validate()?;
        if !request.email.contains('@') {
            return Err(DomainError::validation("email is invalid"));
        }

        self.store.transaction(move |state| {
            let cart = state
                .carts
                .get(&request.session)
                .filter(|c| !c.is_empty())
                .ok_or(DomainError::CartEmpty)?
                .clone();

            // Defend against the gap between cart validation and payment
            // completion: someone else may have bought the stock out from
            // under this session's expired holds.
            for item in &cart.items {
                let variant = state.variant(item.variant_id)?;
                if variant.stock < item.quantity {
                    return Err(DomainError::commit_conflict(format!(
                        "variant {} has {} left, cart wants {}",
                        variant.sku, variant.stock, item.quantity
                    )));
                }
            }

            let discount = cart
                .discount_code
                .as_deref()
                .and_then(|code| state.discounts.get(code));
            let totals = calculate_totals(&cart.items, discount);

            let order_number = allocate_order_number(state, now)?;

            // Permanent deduction, one variant at a time, still inside the
            // same transaction as the validation above.
            for item in &cart.items {
                let variant = state.variant_mut(item.variant_id)?;
                variant.stock = variant
                    .stock
                    .checked_sub(item.quantity)
                    .ok_or_else(|| DomainError::commit_conflict("stock changed mid-commit"))?;
            }

            if let Some(code) = cart.discount_code.as_deref() {
                if let Some(discount) = state.discounts.get_mut(code) {
                    discount.usage_count += 1;
                }
            }

            let order = Order {
                id: OrderId::new(),
                order_number,
                customer_id: request.customer_id,
                email: request.email.clone(),
                status: OrderStatus::Paid,
                totals,
                shipping_address: request.shipping_address.clone(),
                payment_reference: request.payment_reference.clone(),
                items: cart
                    .items
                    .iter()
                    .map(|i| OrderItem {
                        variant_id: i.variant_id,
                        quantity: i.quantity,
                        price: i.price,
                    })
                    .collect(),
                created_at: now,
            };

            // Clear the cart's lines and every hold the session owns; the
            // deduction above has taken over the claim.
            if let Some(live_cart) = state.carts.get_mut(&request.session) {
                live_cart.items.clear();
                live_cart.discount_code = None;
            }
            state.reservations.retain(|_, r| r.holder != request.session);

            info!(
                order_number = %order.order_number,
                total = %order.totals.total,
                "order committed"
            );
            state.orders.insert(order.id, order.clone());
            Ok(order)
        })
    }

    /// Fetch an order. When a customer identity is supplied, it must own the
    /// order.
    pub fn get_order(
        &self,
        order_id: OrderId,
        customer_id: Option<CustomerId>,
    ) -> DomainResult<Order> {
        self.store.read(|state| {
            let order = state.orders.get(&order_id).ok_or(DomainError::NotFound)?;
            if let Some(requester) = customer_id {
                if order.customer_id != Some(requester) {
                    return Err(DomainError::Unauthorized);
                }
            }
            Ok(order.clone())
        })
    }

    pub fn get_order_by_number(&self, order_number: &str) -> DomainResult<Order> {
        self.store.read(|state| {
            state
                .orders
                .values()
                .find(|o| o.order_number == order_number)
                .cloned()
                .ok_or(DomainError::NotFound)
        })
    }

    /// A customer's orders, newest first.
    pub fn orders_for_customer(&self, customer_id: CustomerId) -> Vec<Order> {
        self.store.read(|state| {
            state
                .orders_for_customer(customer_id)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn update_status(&self, order_id: OrderId, status: OrderStatus) -> DomainResult<Order> {
        self.store.transaction(|state| {
            let order = state.orders.get_mut(&order_id).ok_or(DomainError::NotFound)?;
            debug!(order_number = %order.order_number, ?status, "order status updated");
            order.status = status;
            Ok(order.clone())
        })
    }
}

fn allocate_order_number(state: &StoreState, now: DateTime<Utc>) -> DomainResult<String> {
    for _ in 0..ORDER_NUMBER_ATTEMPTS {
        let candidate = generate_order_number(now);
        if !state.order_number_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(DomainError::commit_conflict(
        "could not allocate a unique order number",
    ))
}
