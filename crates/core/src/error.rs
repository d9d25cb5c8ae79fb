//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (availability,
/// ownership, validation). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Requested quantity exceeds stock minus active reservations.
    #[error("insufficient inventory")]
    InsufficientInventory,

    /// The referenced variant does not exist.
    #[error("variant not found")]
    VariantNotFound,

    /// Checkout was attempted against a cart with no line items.
    #[error("cart is empty")]
    CartEmpty,

    /// The cart item does not exist or belongs to a different session.
    #[error("item not found")]
    ItemNotFound,

    /// Discount code is unknown, inactive, expired, or exhausted.
    #[error("invalid discount: {0}")]
    InvalidDiscount(String),

    /// The caller does not own the requested resource.
    #[error("unauthorized")]
    Unauthorized,

    /// Stock changed between cart validation and order commit.
    #[error("order commit conflict: {0}")]
    OrderCommitConflict(String),

    /// A requested resource was not found (generic, non-variant).
    #[error("not found")]
    NotFound,

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_discount(msg: impl Into<String>) -> Self {
        Self::InvalidDiscount(msg.into())
    }

    pub fn commit_conflict(msg: impl Into<String>) -> Self {
        Self::OrderCommitConflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
