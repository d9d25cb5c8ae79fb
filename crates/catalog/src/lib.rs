//! `dropfront-catalog` — product and variant records.
//!
//! The catalog is a thin collaborator of the inventory core: variants carry the
//! `stock` field the ledger mutates, but all reservation accounting happens
//! elsewhere.

pub mod product;

pub use product::{Product, StockStatus, Variant, slugify, stock_status};
