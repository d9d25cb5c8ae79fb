//! Inventory ledger: the single source of truth for stock and holds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use dropfront_core::{DomainError, DomainResult, ReservationId, SessionId, VariantId};
use dropfront_inventory::Reservation;

use crate::memory::TransactionalStore;

/// Stateless service over the transactional store. Cheap to clone and share.
#[derive(Debug)]
pub struct InventoryLedger<S> {
    store: Arc<S>,
}

impl<S> Clone for InventoryLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: TransactionalStore> InventoryLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Place a 15-minute hold on `qty` units of a variant.
    ///
    /// The availability check and the insert happen in one transaction, so two
    /// concurrent reserves can never jointly exceed what is available.
    pub fn reserve(
        &self,
        variant_id: VariantId,
        qty: u32,
        holder: SessionId,
        now: DateTime<Utc>,
    ) -> DomainResult<ReservationId> {
        if qty == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        self.store.transaction(|state| {
            let available = state.available(variant_id, now)?;
            if qty > available {
                debug!(%variant_id, qty, available, "reserve rejected");
                return Err(DomainError::InsufficientInventory);
            }

            let reservation = Reservation::new(variant_id, qty, holder.clone(), now);
            let id = reservation.id;
            state.reservations.insert(id, reservation);
            debug!(%variant_id, qty, reservation_id = %id, "stock reserved");
            Ok(id)
        })
    }

    /// Delete one hold. Idempotent: releasing an already-gone hold is fine.
    pub fn release(&self, reservation_id: ReservationId) -> DomainResult<()> {
        self.store.transaction(|state| {
            state.reservations.remove(&reservation_id);
            Ok(())
        })
    }

    /// Delete every hold owned by a session. Returns how many went away.
    pub fn release_by_holder(&self, holder: &SessionId) -> DomainResult<usize> {
        self.store.transaction(|state| {
            let before = state.reservations.len();
            state.reservations.retain(|_, r| r.holder != *holder);
            Ok(before - state.reservations.len())
        })
    }

    /// Permanently reduce stock. Commit-time only; reservations never touch
    /// the stock column.
    pub fn deduct(&self, variant_id: VariantId, qty: u32) -> DomainResult<()> {
        self.store.transaction(|state| {
            let variant = state.variant_mut(variant_id)?;
            variant.stock = variant
                .stock
                .checked_sub(qty)
                .ok_or(DomainError::InsufficientInventory)?;
            Ok(())
        })
    }

    /// Restock (catalog management path).
    pub fn add(&self, variant_id: VariantId, qty: u32) -> DomainResult<u32> {
        self.store.transaction(|state| {
            let variant = state.variant_mut(variant_id)?;
            variant.stock += qty;
            Ok(variant.stock)
        })
    }

    /// Read-only availability. Not a reservation guarantee: a read followed by
    /// a reserve is two transactions.
    pub fn available(&self, variant_id: VariantId, now: DateTime<Utc>) -> DomainResult<u32> {
        self.store.read(|state| state.available(variant_id, now))
    }

    /// Delete every hold with `expires_at < now`. Safe to call repeatedly;
    /// a second pass with nothing new deletes zero rows.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        self.store.transaction(|state| {
            let before = state.reservations.len();
            state.reservations.retain(|_, r| !r.is_expired(now));
            Ok(before - state.reservations.len())
        })
    }
}

/// Scheduler-facing sweep over stale holds.
///
/// Invoked on a fixed interval by an external trigger; idempotent, and safe to
/// overlap with in-flight reservations and with itself.
#[derive(Debug)]
pub struct ReservationReaper<S> {
    ledger: InventoryLedger<S>,
}

impl<S> Clone for ReservationReaper<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
        }
    }
}

impl<S: TransactionalStore> ReservationReaper<S> {
    pub fn new(ledger: InventoryLedger<S>) -> Self {
        Self { ledger }
    }

    pub fn sweep(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let expired = self.ledger.expire_stale(now)?;
        if expired > 0 {
            info!(expired, "expired stale reservations");
        }
        Ok(expired)
    }
}
