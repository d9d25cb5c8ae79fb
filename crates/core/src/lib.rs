//! `dropfront-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{
    CartItemId, CustomerId, DropId, OrderId, ProductId, ReservationId, SessionId, VariantId,
};
pub use money::Money;
