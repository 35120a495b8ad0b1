use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::{self, OrderAction, OrderStatus, Role};

/// One line of a cart.
///
/// `id` is the server-assigned item id for an authenticated cart, or a
/// locally generated `guest-<uuid>` for a guest cart. Uniqueness within a
/// cart is by `food_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub food_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CartItem {
    pub fn guest(food_id: i64, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            id: format!("guest-{}", Uuid::new_v4()),
            food_id,
            name: name.into(),
            price,
            quantity,
            notes: None,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A cart with derived totals.
///
/// `total_items` and `total_amount` are never stored independently; they are
/// recomputed from `items` on every mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_amount: Decimal,
}

impl Cart {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            items,
            total_items: 0,
            total_amount: Decimal::ZERO,
        };
        cart.recompute();
        cart
    }

    pub fn recompute(&mut self) {
        self.total_items = self.items.iter().map(|i| i.quantity).sum();
        self.total_amount = self.items.iter().map(|i| i.line_total()).sum();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_by_food(&self, food_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.food_id == food_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Vnpay,
    Other(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Vnpay => "vnpay",
            PaymentMethod::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Cash on delivery",
            PaymentMethod::Vnpay => "VNPay",
            PaymentMethod::Other(raw) => raw,
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(raw: &str) -> Self {
        match raw {
            "cash" => PaymentMethod::Cash,
            "vnpay" => PaymentMethod::Vnpay,
            other => PaymentMethod::Other(other.to_string()),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        PaymentMethod::from(raw.as_str())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Unknown(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => PaymentStatus::Pending,
            "processing" => PaymentStatus::Processing,
            "completed" => PaymentStatus::Completed,
            _ => PaymentStatus::Unknown(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

impl Default for Payment {
    fn default() -> Self {
        Self {
            method: PaymentMethod::Cash,
            status: PaymentStatus::Pending,
        }
    }
}

/// One line of an order, priced at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub food_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Which leg of the trip a shipper is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLeg {
    /// Heading to the restaurant.
    Pickup,
    /// Heading to the customer.
    Delivery,
}

/// A normalized order as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Client-generated correlation token, echoed back by the backend so a
    /// just-created order can be located without guessing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<Uuid>,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub delivery_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Latest tracking message from the backend, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn status_label(&self) -> &str {
        self.status.label()
    }

    pub fn status_color(&self) -> &'static str {
        self.status.color()
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn next_action_for(&self, role: Role) -> Option<OrderAction> {
        lifecycle::next_action(role, &self.status)
    }

    pub fn cancel_action_for(&self, role: Role) -> Option<OrderAction> {
        lifecycle::cancel_action(role, &self.status)
    }

    pub fn available_actions_for(&self, role: Role) -> Vec<OrderAction> {
        lifecycle::available_actions(role, &self.status)
    }

    /// The leg a shipper is driving for this order, if any.
    pub fn route_leg(&self) -> Option<RouteLeg> {
        match self.status {
            OrderStatus::Ready | OrderStatus::Assigned => Some(RouteLeg::Pickup),
            OrderStatus::PickedUp | OrderStatus::Delivering => Some(RouteLeg::Delivery),
            _ => None,
        }
    }

    /// Role-scoped view of the order's addresses.
    ///
    /// The seller only needs the pickup side, the customer only the delivery
    /// side; the shipper drives both legs and keeps both.
    pub fn scoped_for(&self, role: Role) -> Order {
        let mut order = self.clone();
        match role {
            Role::Seller => {
                order.delivery_address = String::new();
                order.delivery_phone = String::new();
            }
            Role::Customer => {
                order.pickup_address = None;
                order.pickup_phone = None;
            }
            Role::Shipper => {}
        }
        order
    }
}

/// A catalog food entry, as much of it as the client needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `None` when the backend reports a role this client does not know.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
