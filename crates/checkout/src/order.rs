use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dropfront_carts::CartTotals;
use dropfront_core::{CustomerId, DomainError, DomainResult, Money, OrderId, VariantId};

/// Order fulfillment status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses that count as a completed purchase (used by early-access
    /// previous-customer checks).
    pub fn is_paid_family(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Processing | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Where the order ships. Validated as non-empty fields, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingAddress {
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "shipping address {name} is required"
                )));
            }
        }
        Ok(())
    }
}

/// A committed order line: frozen copy of the cart line at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub variant_id: VariantId,
    pub quantity: u32,
    /// Unit price snapshotted when the item was added to the cart.
    pub price: Money,
}

/// Immutable once created. Totals and lines are snapshots decoupled from live
/// catalog prices; only `status` advances afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub status: OrderStatus,
    pub totals: CartTotals,
    pub shipping_address: ShippingAddress,
    /// Payment confirmation reference, recorded verbatim.
    pub payment_reference: String,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}
