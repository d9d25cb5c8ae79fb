//! `dropfront-inventory` — reservation records and availability arithmetic.
//!
//! Pure domain types only; the transactional ledger service that enforces
//! no-oversell lives in `dropfront-store`.

pub mod reservation;

pub use reservation::{
    RESERVATION_TTL_MINUTES, Reservation, available, reservation_ttl, reserved_quantity,
};
