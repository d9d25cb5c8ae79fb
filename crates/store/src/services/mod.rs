//! Stateless service objects over the transactional store.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod drops;
pub mod inventory;

pub use cart::CartService;
pub use catalog::{CatalogService, VariantSpec};
pub use checkout::{CheckoutRequest, CheckoutService};
pub use drops::{DropService, DropSweepOutcome};
pub use inventory::{InventoryLedger, ReservationReaper};
