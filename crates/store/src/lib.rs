//! `dropfront-store` — the transactional persistence seam and the services
//! built on it.
//!
//! Correctness against concurrent oversell is delegated entirely to
//! [`TransactionalStore`]: every mutating operation is one atomic transaction,
//! and the in-memory implementation serializes them. The services themselves
//! hold no state beyond a store handle.

pub mod memory;
pub mod services;
pub mod state;


pub use memory::{MemoryStore, TransactionalStore};
pub use services::{
    CartService, CatalogService, CheckoutRequest, CheckoutService, DropService, DropSweepOutcome,
    InventoryLedger, ReservationReaper, VariantSpec,
};
pub use state::StoreState;
