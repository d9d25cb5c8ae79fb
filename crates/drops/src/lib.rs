//! `dropfront-drops` — limited-release lifecycle state machine.
//!
//! Pure transition rules and countdown math; the sweep service that applies
//! them against stored drops lives in `dropfront-store`.

pub mod countdown;
pub mod r#drop;

pub use countdown::{Countdown, countdown};
pub use r#drop::{Drop, DropStatus, EarlyAccessRule, next_status};
