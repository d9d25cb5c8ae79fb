//! `dropfront-checkout` — order records and order-number generation.
//!
//! The orchestrator that atomically converts a cart into one of these lives in
//! `dropfront-store`.

pub mod number;
pub mod order;

pub use number::generate_order_number;
pub use order::{Order, OrderItem, OrderStatus, ShippingAddress};
