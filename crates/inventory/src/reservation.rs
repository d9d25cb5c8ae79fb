use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use dropfront_core::{ReservationId, SessionId, VariantId};

/// How long a hold keeps stock claimed before the reaper may expire it.
pub const RESERVATION_TTL_MINUTES: i64 = 15;

pub fn reservation_ttl() -> Duration {
    Duration::minutes(RESERVATION_TTL_MINUTES)
}

/// A time-boxed claim on variant stock tied to a session.
///
/// Transient by design: destroyed by release, expiry, or order commit. Never
/// survives past checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub variant_id: VariantId,
    pub quantity: u32,
    pub holder: SessionId,
    pub expires_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        variant_id: VariantId,
        quantity: u32,
        holder: SessionId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            variant_id,
            quantity,
            holder,
            expires_at: now + reservation_ttl(),
        }
    }

    /// Expired holds no longer count against availability; the reaper deletes
    /// them lazily.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now)
    }
}

/// Sum the active (non-expired) held quantity for one variant.
pub fn reserved_quantity<'a>(
    reservations: impl IntoIterator<Item = &'a Reservation>,
    variant_id: VariantId,
    now: DateTime<Utc>,
) -> u32 {
    reservations
        .into_iter()
        .filter(|r| r.variant_id == variant_id && r.is_active(now))
        .map(|r| r.quantity)
        .sum()
}

/// `available = stock − Σ(active reservations)`, clamped at zero for display.
///
/// A read of this value is never a reservation guarantee; only a reserve call
/// inside the same transaction is.
pub fn available(stock: u32, reserved: u32) -> u32 {
    stock.saturating_sub(reserved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(tag: &str) -> SessionId {
        SessionId::new(format!("session_{tag}"))
    }

    #[test]
    fn fresh_reservation_expires_after_ttl() {
        let now = Utc::now();
        let r = Reservation::new(VariantId::new(), 2, session("a"), now);
        assert!(r.is_active(now));
        assert!(r.is_active(now + Duration::minutes(14)));
        assert!(r.is_expired(now + Duration::minutes(16)));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let r = Reservation::new(VariantId::new(), 1, session("a"), now);
        // expires_at < now is the reaper's predicate; exactly-at is still active.
        assert!(r.is_active(now + reservation_ttl()));
    }

    #[test]
    fn reserved_quantity_ignores_other_variants_and_expired() {
        let now = Utc::now();
        let variant = VariantId::new();
        let mut stale = Reservation::new(variant, 5, session("a"), now);
        stale.expires_at = now - Duration::seconds(1);
        let live = Reservation::new(variant, 3, session("b"), now);
        let other = Reservation::new(VariantId::new(), 7, session("c"), now);

        let held = reserved_quantity([&stale, &live, &other], variant, now);
        assert_eq!(held, 3);
    }

    #[test]
    fn available_never_goes_negative() {
        assert_eq!(available(5, 3), 2);
        assert_eq!(available(3, 5), 0);
        assert_eq!(available(0, 0), 0);
    }
}
