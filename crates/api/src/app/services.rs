//! Store and service construction shared by every handler.

use std::sync::Arc;

use dropfront_store::{
    CartService, CatalogService, CheckoutService, DropService, InventoryLedger, MemoryStore,
    ReservationReaper,
};

/// One store, one service object per concern, all behind an `Arc` in the
/// router's extension layer.
pub struct AppServices {
    pub store: Arc<MemoryStore>,
    pub catalog: CatalogService<MemoryStore>,
    pub ledger: InventoryLedger<MemoryStore>,
    pub carts: CartService<MemoryStore>,
    pub checkout: CheckoutService<MemoryStore>,
    pub drops: DropService<MemoryStore>,
    pub reaper: ReservationReaper<MemoryStore>,
}

impl AppServices {
    pub fn build() -> Self {
        let store = Arc::new(MemoryStore::new());
        let ledger = InventoryLedger::new(store.clone());
        Self {
            catalog: CatalogService::new(store.clone()),
            carts: CartService::new(store.clone()),
            checkout: CheckoutService::new(store.clone()),
            drops: DropService::new(store.clone()),
            reaper: ReservationReaper::new(ledger.clone()),
            ledger,
            store,
        }
    }
}
