//! `dropfront-carts` — cart aggregate records, discounts, and totals math.
//!
//! Pure domain types; the session-facing cart service (which keeps line items
//! and ledger reservations in lockstep) lives in `dropfront-store`.

pub mod cart;
pub mod discount;
pub mod totals;

pub use cart::{CART_TTL_DAYS, Cart, CartItem, cart_ttl};
pub use discount::{Discount, DiscountKind};
pub use totals::{
    CartTotals, FLAT_SHIPPING, FREE_SHIPPING_OVER, TAX_RATE_PERCENT, calculate_totals,
};
