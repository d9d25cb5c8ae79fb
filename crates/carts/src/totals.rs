//! Cart totals arithmetic: subtotal, discount, shipping, tax.
//!
//! One pure function so the cart endpoint and the checkout orchestrator can
//! never disagree about the math.

use serde::{Deserialize, Serialize};

use dropfront_core::Money;

use crate::cart::CartItem;
use crate::discount::Discount;

/// Orders over this subtotal ship free.
pub const FREE_SHIPPING_OVER: Money = Money::from_dollars(100);
/// Flat shipping fee below the free-shipping line.
pub const FLAT_SHIPPING: Money = Money::from_dollars(10);
/// Sales tax, applied to subtotal minus discount.
pub const TAX_RATE_PERCENT: u32 = 8;

/// Computed cart totals. Frozen onto the order at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn empty() -> Self {
        Self {
            subtotal: Money::ZERO,
            discount: Money::ZERO,
            shipping: Money::ZERO,
            tax: Money::ZERO,
            total: Money::ZERO,
        }
    }
}

/// Compute totals for a set of lines and an optional (already validated)
/// discount.
pub fn calculate_totals(items: &[CartItem], discount: Option<&Discount>) -> CartTotals {
    let subtotal: Money = items.iter().map(CartItem::line_total).sum();
    let discount = discount.map(|d| d.amount(subtotal)).unwrap_or(Money::ZERO);

    // Strictly greater than the threshold, matching the storefront's
    // "free shipping over $100" copy.
    let shipping = if subtotal > FREE_SHIPPING_OVER {
        Money::ZERO
    } else {
        FLAT_SHIPPING
    };

    let tax = (subtotal - discount).percent(TAX_RATE_PERCENT);
    let total = subtotal - discount + shipping + tax;

    CartTotals {
        subtotal,
        discount,
        shipping,
        tax,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::DiscountKind;
    use dropfront_core::VariantId;

    fn line(price_cents: i64, qty: u32) -> CartItem {
        CartItem::new(VariantId::new(), qty, Money::from_cents(price_cents))
    }

    #[test]
    fn worked_example_two_fifties_ten_percent() {
        // Two items at $50, 10% off: subtotal 100, discount 10, shipping 10
        // (100 is not > 100), tax (100-10)*8% = 7.20, total 107.20.
        let items = vec![line(50_00, 1), line(50_00, 1)];
        let d = Discount::new("TEN", DiscountKind::Percentage(10));

        let t = calculate_totals(&items, Some(&d));
        assert_eq!(t.subtotal, Money::from_cents(100_00));
        assert_eq!(t.discount, Money::from_cents(10_00));
        assert_eq!(t.shipping, Money::from_cents(10_00));
        assert_eq!(t.tax, Money::from_cents(7_20));
        assert_eq!(t.total, Money::from_cents(107_20));
    }

    #[test]
    fn free_shipping_is_strictly_over_threshold() {
        let at = calculate_totals(&[line(100_00, 1)], None);
        assert_eq!(at.shipping, FLAT_SHIPPING);

        let over = calculate_totals(&[line(100_01, 1)], None);
        assert_eq!(over.shipping, Money::ZERO);
    }

    #[test]
    fn empty_cart_still_pays_flat_shipping_if_asked() {
        // Totals on an empty cart are well-defined; checkout rejects empties
        // separately.
        let t = calculate_totals(&[], None);
        assert_eq!(t.subtotal, Money::ZERO);
        assert_eq!(t.total, FLAT_SHIPPING);
    }

    #[test]
    fn oversized_fixed_discount_cannot_push_subtotal_negative() {
        let d = Discount::new("BIG", DiscountKind::Fixed(Money::from_dollars(500)));
        let t = calculate_totals(&[line(30_00, 1)], Some(&d));
        assert_eq!(t.discount, Money::from_cents(30_00));
        assert_eq!(t.tax, Money::ZERO);
        assert_eq!(t.total, FLAT_SHIPPING);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: the discount never exceeds the subtotal, for either
            /// discount kind and any cart contents.
            #[test]
            fn discount_never_exceeds_subtotal(
                prices in prop::collection::vec((1i64..100_000i64, 1u32..10u32), 0..8),
                pct in 0u32..500u32,
                fixed in 0i64..10_000_000i64,
            ) {
                let items: Vec<CartItem> =
                    prices.iter().map(|(p, q)| line(*p, *q)).collect();

                for kind in [
                    DiscountKind::Percentage(pct),
                    DiscountKind::Fixed(Money::from_cents(fixed)),
                ] {
                    let d = Discount::new("P", kind);
                    let t = calculate_totals(&items, Some(&d));
                    prop_assert!(t.discount <= t.subtotal);
                    prop_assert!(t.tax >= Money::ZERO);
                    prop_assert_eq!(
                        t.total,
                        t.subtotal - t.discount + t.shipping + t.tax
                    );
                }
            }
        }
    }
}
