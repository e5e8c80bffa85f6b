//! Order record: shape, status lifecycle and the embedded shipping address

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::{TransitionError, ValidationError};
use crate::core::validation::{Validate, Violations, validators};

/// Lifecycle tag of an order.
///
/// ```text
/// pending ──▶ paid ──▶ shipped ──▶ delivered
///    │          │
///    └──────────┴──▶ cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal. Nothing returns to `pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses directly reachable from this one
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Paid, OrderStatus::Cancelled],
            OrderStatus::Paid => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
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
        let normalized = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown order status '{}'", s))
    }
}

/// One (product reference, quantity) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "product")]
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Shipping address embedded in an order.
///
/// `postalCode` also accepts `pincode` and `zip` on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub street: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,

    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(alias = "pincode", alias = "zip")]
    pub postal_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Validate for ShippingAddress {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Violations::new();
        v.check("address.fullName", validators::required_text("fullName", &self.full_name));
        v.check("address.street", validators::required_text("street", &self.street));
        v.check("address.city", validators::required_text("city", &self.city));
        v.check("address.postalCode", validators::required_text("postalCode", &self.postal_code));
        if !self.postal_code.trim().is_empty() {
            v.check(
                "address.postalCode",
                validators::postal_code_format("postalCode", &self.postal_code),
            );
        }
        if let Some(phone) = &self.phone {
            v.check("address.phone", validators::phone_format("phone", phone));
        }
        v.check("address.state", validators::optional_text("state", self.state.as_deref()));
        v.check("address.country", validators::optional_text("country", self.country.as_deref()));
        v.check(
            "address.landmark",
            validators::optional_text("landmark", self.landmark.as_deref()),
        );
        v.finish()
    }
}

/// A persisted checkout transaction.
///
/// Serialized with the document field names `user`, `products`,
/// `paymentMethod`, `totalAmount` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,

    #[serde(rename = "user")]
    pub user_id: Uuid,

    #[serde(rename = "products")]
    pub line_items: Vec<LineItem>,

    pub address: ShippingAddress,

    pub payment_method: String,

    pub total_amount: f64,

    #[serde(default)]
    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a fresh `pending` order stamped with the current time
    pub fn new(
        user_id: Uuid,
        line_items: Vec<LineItem>,
        address: ShippingAddress,
        payment_method: String,
        total_amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            line_items,
            address,
            payment_method,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Move to `next`, enforcing the lifecycle graph
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError::NotAllowed {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|item| item.quantity as u64).sum()
    }
}

impl Entity for Order {
    fn resource_name() -> &'static str {
        "orders"
    }

    fn resource_name_singular() -> &'static str {
        "order"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "user" => Some(self.user_id.to_string()),
            "status" => Some(self.status.to_string()),
            "paymentMethod" => Some(self.payment_method.clone()),
            _ => None,
        }
    }
}
