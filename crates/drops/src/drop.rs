use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dropfront_core::{DropId, ProductId};

/// Drop lifecycle status. Advances monotonically along
/// `scheduled → early_access → live → sold_out`; never regresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropStatus {
    Scheduled,
    EarlyAccess,
    Live,
    SoldOut,
}

impl DropStatus {
    /// Position along the lifecycle; transitions may only increase this.
    pub fn rank(&self) -> u8 {
        match self {
            DropStatus::Scheduled => 0,
            DropStatus::EarlyAccess => 1,
            DropStatus::Live => 2,
            DropStatus::SoldOut => 3,
        }
    }
}

/// Who gets in during the early-access window.
///
/// Closed tagged union; anything we do not recognize deserializes to
/// `Unknown` and is denied at dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EarlyAccessRule {
    /// At least one prior order in the paid family.
    PreviousCustomer,
    /// Named loyalty tier. No tier logic is wired up yet, so this denies.
    VipTier { tier: String },
    #[serde(other)]
    Unknown,
}

/// A time-gated limited release of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drop {
    pub id: DropId,
    pub product_id: ProductId,
    pub launch_date: DateTime<Utc>,
    pub early_access_date: Option<DateTime<Utc>>,
    pub early_access_rule: Option<EarlyAccessRule>,
    pub status: DropStatus,
}

impl Drop {
    pub fn new(
        product_id: ProductId,
        launch_date: DateTime<Utc>,
        early_access_date: Option<DateTime<Utc>>,
        early_access_rule: Option<EarlyAccessRule>,
    ) -> Self {
        Self {
            id: DropId::new(),
            product_id,
            launch_date,
            early_access_date,
            early_access_rule,
            status: DropStatus::Scheduled,
        }
    }

    /// True while `now` sits inside `[early_access_date, launch_date)`.
    /// False when no early-access window was configured.
    pub fn in_early_access_window(&self, now: DateTime<Utc>) -> bool {
        match self.early_access_date {
            Some(early) => now >= early && now < self.launch_date,
            None => false,
        }
    }
}

/// The sweep's transition rule: given the clock and the product's remaining
/// total stock, what status should this drop move to next, if any?
///
/// Returns at most one step; a sweep loop converges because every step
/// strictly increases `rank()`.
pub fn next_status(drop: &Drop, now: DateTime<Utc>, total_stock: u32) -> Option<DropStatus> {
    match drop.status {
        DropStatus::Scheduled if now >= drop.launch_date => Some(DropStatus::Live),
        DropStatus::Scheduled if drop.in_early_access_window(now) => Some(DropStatus::EarlyAccess),
        DropStatus::EarlyAccess if now >= drop.launch_date => Some(DropStatus::Live),
        DropStatus::Live if total_stock == 0 => Some(DropStatus::SoldOut),
        // sold_out is terminal; restock does not revive a drop.
        _ => None,
    }
}
