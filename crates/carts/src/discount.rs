use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dropfront_core::{DomainError, DomainResult, Money};

/// Discount kind and magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Whole-number percentage off the subtotal.
    Percentage(u32),
    /// Fixed amount off, capped at the subtotal.
    Fixed(Money),
}

/// A redeemable discount code.
///
/// Codes are stored upper-cased; lookups normalize the caller's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub code: String,
    pub kind: DiscountKind,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
}

impl Discount {
    pub fn new(code: impl Into<String>, kind: DiscountKind) -> Self {
        Self {
            code: code.into().to_uppercase(),
            kind,
            active: true,
            expires_at: None,
            usage_limit: None,
            usage_count: 0,
        }
    }

    /// Check the code is currently redeemable.
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.active {
            return Err(DomainError::invalid_discount("code is no longer active"));
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at < now {
                return Err(DomainError::invalid_discount("code has expired"));
            }
        }
        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                return Err(DomainError::invalid_discount("usage limit reached"));
            }
        }
        Ok(())
    }

    /// Amount taken off a subtotal. Always clamped so the discount never
    /// exceeds the subtotal itself.
    pub fn amount(&self, subtotal: Money) -> Money {
        let raw = match &self.kind {
            DiscountKind::Percentage(pct) => subtotal.percent(*pct),
            DiscountKind::Fixed(value) => *value,
        };
        raw.min(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn percentage_amount() {
        let d = Discount::new("welcome10", DiscountKind::Percentage(10));
        assert_eq!(d.code, "WELCOME10");
        assert_eq!(d.amount(Money::from_dollars(100)), Money::from_dollars(10));
    }

    #[test]
    fn fixed_amount_clamped_to_subtotal() {
        let d = Discount::new("FLAT25", DiscountKind::Fixed(Money::from_dollars(25)));
        assert_eq!(d.amount(Money::from_dollars(100)), Money::from_dollars(25));
        assert_eq!(d.amount(Money::from_dollars(15)), Money::from_dollars(15));
    }

    #[test]
    fn validate_rejects_inactive() {
        let mut d = Discount::new("X", DiscountKind::Percentage(5));
        d.active = false;
        let err = d.validate(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDiscount(_)));
    }

    #[test]
    fn validate_rejects_expired() {
        let mut d = Discount::new("X", DiscountKind::Percentage(5));
        d.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(d.validate(Utc::now()).is_err());

        d.expires_at = Some(Utc::now() + Duration::hours(1));
        assert!(d.validate(Utc::now()).is_ok());
    }

    #[test]
    fn validate_rejects_exhausted() {
        let mut d = Discount::new("X", DiscountKind::Percentage(5));
        d.usage_limit = Some(3);
        d.usage_count = 3;
        assert!(d.validate(Utc::now()).is_err());

        d.usage_count = 2;
        assert!(d.validate(Utc::now()).is_ok());
    }
}
