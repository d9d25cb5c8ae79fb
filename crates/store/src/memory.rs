//! Transactional store seam and its in-memory implementation.

use std::sync::{Mutex, MutexGuard};

use dropfront_core::DomainResult;

use crate::state::StoreState;

/// Atomic, all-or-nothing access to the store.
///
/// Every mutating core operation runs inside exactly one `transaction` call:
/// the closure either returns `Ok` and all of its writes commit together, or
/// returns `Err` and none of them are visible. Implementations must make
/// concurrent transactions on the same data behave as if serialized; this is
/// the whole defense against oversell, so a SQL-backed implementation needs
/// row locks or serializable isolation, not read-committed alone.
pub trait TransactionalStore: Send + Sync {
    fn transaction<T>(&self, f: impl FnOnce(&mut StoreState) -> DomainResult<T>) -> DomainResult<T>;

    /// Read-only snapshot access.
    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R;
}

/// In-memory store.
///
/// One mutex over the whole state: transactions are fully serialized, and a
/// working copy is swapped in only on success, which gives exact rollback for
/// free. Intended for tests/dev and as the reference semantics a persistent
/// backend must match. Not optimized for performance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            // A poisoned lock means a panic mid-transaction; the committed
            // state is still the last consistent one, so keep serving it.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TransactionalStore for MemoryStore {
    fn transaction<T>(&self, f: impl FnOnce(&mut StoreState) -> DomainResult<T>) -> DomainResult<T> {
        let mut guard = self.lock();
        let mut working = guard.clone();
        match f(&mut working) {
            Ok(value) => {
                *guard = working;
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dropfront_catalog::Product;
    use dropfront_core::{DomainError, Money};

    #[test]
    fn failed_transaction_leaves_no_trace() {
        let store = MemoryStore::new();

        let err = store.transaction(|state| {
            let product = Product::new("Tee", Money::from_dollars(40), Utc::now())?;
            state.products.insert(product.id, product);
            Err::<(), _>(DomainError::validation("boom"))
        });

        assert!(err.is_err());
        assert_eq!(store.read(|s| s.products.len()), 0);
    }

    #[test]
    fn successful_transaction_commits_all_writes() {
        let store = MemoryStore::new();

        store
            .transaction(|state| {
                for name in ["A", "B"] {
                    let product = Product::new(name, Money::from_dollars(10), Utc::now())?;
                    state.products.insert(product.id, product);
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(store.read(|s| s.products.len()), 2);
    }
}
