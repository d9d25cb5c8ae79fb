//! Drop lifecycle service: sweeps and early-access checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use dropfront_core::{CustomerId, DomainError, DomainResult, DropId, ProductId};
use dropfront_drops::{Drop, DropStatus, EarlyAccessRule, next_status};

use crate::memory::TransactionalStore;

/// Counts returned by the activation sweep, for the scheduler's response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropSweepOutcome {
    pub activated: usize,
    pub early_access: usize,
}

#[derive(Debug)]
pub struct DropService<S> {
    store: Arc<S>,
}

impl<S> Clone for DropService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: TransactionalStore> DropService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Schedule a drop for a product. One drop per product.
    pub fn create_drop(
        &self,
        product_id: ProductId,
        launch_date: DateTime<Utc>,
        early_access_date: Option<DateTime<Utc>>,
        early_access_rule: Option<EarlyAccessRule>,
    ) -> DomainResult<Drop> {
        if let Some(early) = early_access_date {
            if early >= launch_date {
                return Err(DomainError::validation(
                    "early access must open before launch",
                ));
            }
        }

        self.store.transaction(|state| {
            state.product(product_id)?;
            if state.drops.values().any(|d| d.product_id == product_id) {
                return Err(DomainError::validation("product already has a drop"));
            }

            let drop = Drop::new(product_id, launch_date, early_access_date, early_access_rule.clone());
            state.drops.insert(drop.id, drop.clone());
            Ok(drop)
        })
    }

    pub fn get(&self, drop_id: DropId) -> DomainResult<Drop> {
        self.store
            .read(|state| state.drops.get(&drop_id).cloned().ok_or(DomainError::NotFound))
    }

    pub fn drop_for_product(&self, product_id: ProductId) -> DomainResult<Drop> {
        self.store.read(|state| {
            state
                .drops
                .values()
                .find(|d| d.product_id == product_id)
                .cloned()
                .ok_or(DomainError::NotFound)
        })
    }

    /// All drops, optionally filtered by status, most recent launch first.
    pub fn list(&self, status: Option<DropStatus>) -> Vec<Drop> {
        self.store.read(|state| {
            let mut drops: Vec<Drop> = state
                .drops
                .values()
                .filter(|d| status.is_none_or(|s| d.status == s))
                .cloned()
                .collect();
            drops.sort_by(|a, b| b.launch_date.cmp(&a.launch_date));
            drops
        })
    }

    /// Scheduled or early-access drops that have not launched yet, soonest
    /// launch first.
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<Drop> {
        self.store.read(|state| {
            let mut drops: Vec<Drop> = state
                .drops
                .values()
                .filter(|d| {
                    matches!(d.status, DropStatus::Scheduled | DropStatus::EarlyAccess)
                        && d.launch_date > now
                })
                .cloned()
                .collect();
            drops.sort_by(|a, b| a.launch_date.cmp(&b.launch_date));
            drops
        })
    }

    pub fn live(&self) -> Vec<Drop> {
        self.list(Some(DropStatus::Live))
    }

    /// Time-driven sweep: move drops whose windows have opened to
    /// `early_access` or `live`. Idempotent; a repeated sweep finds nothing
    /// left to move.
    pub fn activate_drops(&self, now: DateTime<Utc>) -> DomainResult<DropSweepOutcome> {
        self.store.transaction(|state| {
            let mut outcome = DropSweepOutcome::default();

            let ids: Vec<DropId> = state.drops.keys().copied().collect();
            for id in ids {
                let drop = &state.drops[&id];
                let total_stock = state.total_stock(drop.product_id);
                match next_status(drop, now, total_stock) {
                    Some(DropStatus::Live) => {
                        if let Some(d) = state.drops.get_mut(&id) {
                            d.status = DropStatus::Live;
                        }
                        outcome.activated += 1;
                    }
                    Some(DropStatus::EarlyAccess) => {
                        if let Some(d) = state.drops.get_mut(&id) {
                            d.status = DropStatus::EarlyAccess;
                        }
                        outcome.early_access += 1;
                    }
                    // Sold-out is the stock sweep's job, not the clock's.
                    Some(_) | None => {}
                }
            }

            if outcome.activated > 0 || outcome.early_access > 0 {
                info!(
                    activated = outcome.activated,
                    early_access = outcome.early_access,
                    "drop activation sweep"
                );
            }
            Ok(outcome)
        })
    }

    /// Stock-driven sweep: live drops whose product has zero total stock
    /// become `sold_out` (terminal; restock does not revive them).
    pub fn mark_sold_out(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        self.store.transaction(|state| {
            let mut marked = 0;
            let ids: Vec<DropId> = state.drops.keys().copied().collect();
            for id in ids {
                let drop = &state.drops[&id];
                let total_stock = state.total_stock(drop.product_id);
                if next_status(drop, now, total_stock) == Some(DropStatus::SoldOut) {
                    if let Some(d) = state.drops.get_mut(&id) {
                        d.status = DropStatus::SoldOut;
                    }
                    marked += 1;
                }
            }
            if marked > 0 {
                info!(marked, "drops marked sold out");
            }
            Ok(marked)
        })
    }

    /// Fail-closed early-access decision.
    ///
    /// False when: the drop has no early-access window, `now` is outside
    /// `[early_access_date, launch_date)`, no rule is configured, no customer
    /// is identified, or the rule's predicate does not hold. Unknown rule
    /// tags deny.
    pub fn check_early_access(
        &self,
        drop_id: DropId,
        customer_id: Option<CustomerId>,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        self.store.read(|state| {
            let drop = state.drops.get(&drop_id).ok_or(DomainError::NotFound)?;

            if !drop.in_early_access_window(now) {
                return Ok(false);
            }
            let Some(rule) = &drop.early_access_rule else {
                return Ok(false);
            };
            let Some(customer) = customer_id else {
                return Ok(false);
            };

            let granted = match rule {
                EarlyAccessRule::PreviousCustomer => state
                    .orders
                    .values()
                    .any(|o| o.customer_id == Some(customer) && o.status.is_paid_family()),
                // No tier data is wired up; deny until it is.
                EarlyAccessRule::VipTier { .. } => false,
                EarlyAccessRule::Unknown => false,
            };
            Ok(granted)
        })
    }
}
