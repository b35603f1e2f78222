use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an order.
///
/// The happy path is `Created -> Confirmed -> Shipped -> Delivered`. `Cancelled`
/// is reachable from `Created` and `Confirmed` only. `Delivered` and `Cancelled`
/// are terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses reachable from `self` in a single step.
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Created => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown order status '{}'", wanted))
    }
}

/// A line item. Owned by exactly one [`Order`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub package_name: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_variant_name: Option<String>,
    pub amount: Decimal,
}

/// A stored order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Caller-supplied unique identifier. Never changes after creation.
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    /// Incremented on every successful write; used for optimistic concurrency.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new `Created` order from an already validated request.
    pub fn from_request(request: &OrderRequest, now: DateTime<Utc>) -> Self {
        let items: Vec<OrderItem> = request
            .items
            .iter()
            .map(|item| OrderItem {
                package_name: item.package_name.trim().to_string(),
                product_name: item.product_name.trim().to_string(),
                product_variant_name: item.product_variant_name.clone(),
                amount: item.amount.unwrap_or(Decimal::ZERO),
            })
            .collect();
        let total_amount = request
            .total_amount
            .unwrap_or_else(|| items.iter().map(|item| item.amount).sum());

        Self {
            order_number: request.order_number.trim().to_string(),
            package_name: request.package_name.clone(),
            items,
            total_amount,
            status: OrderStatus::Created,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Incoming create-order payload.
///
/// Every field defaults so that missing values surface as validation errors
/// rather than as deserialization failures.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRequest {
    pub order_number: String,
    pub package_name: Option<String>,
    pub items: Vec<OrderItemRequest>,
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemRequest {
    pub package_name: String,
    pub product_name: String,
    pub product_variant_name: Option<String>,
    pub amount: Option<Decimal>,
}

/// Incoming status-update payload. `status` stays a raw string until validated.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub comment: Option<String>,
}
