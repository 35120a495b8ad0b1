use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::lifecycle::{OrderAction, OrderStatus};
use crate::models::{Order, OrderItem, Payment, PaymentMethod, PaymentStatus};

use super::{cart, pick, value_to_decimal, value_to_id, value_to_string};

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutItem {
    pub food_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub delivery_address: String,
    pub delivery_phone: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Echoed back by the backend so the created order can be found again
    /// even if the create response gets lost.
    pub client_token: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub action: OrderAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Normalize a raw order payload into an [`Order`].
///
/// Transition and create responses wrap the order as `{"order": {...}}`;
/// that envelope is unwrapped first. Every field then resolves through the
/// same kind of fallback chains the cart uses.
pub fn normalize_order(raw: &Value) -> Order {
    let raw = raw
        .get("order")
        .filter(|inner| inner.is_object())
        .unwrap_or(raw);

    let items: Vec<OrderItem> = raw
        .get("items")
        .and_then(Value::as_array)
        .map(|raw_items| raw_items.iter().map(normalize_order_item).collect())
        .unwrap_or_default();

    let subtotal = pick(raw, &["subtotal"])
        .and_then(value_to_decimal)
        .unwrap_or_else(|| items.iter().map(OrderItem::line_total).sum());
    let delivery_fee = pick(raw, &["delivery_fee", "shipping_fee"])
        .and_then(value_to_decimal)
        .unwrap_or_default();
    let total_amount = pick(raw, &["total_amount", "total"])
        .and_then(value_to_decimal)
        .unwrap_or_else(|| subtotal + delivery_fee);

    let restaurant = raw.get("restaurant").filter(|r| r.is_object());

    Order {
        id: pick(raw, &["id", "order_id"])
            .map(id_string)
            .unwrap_or_default(),
        order_number: raw.get("order_number").and_then(value_to_string),
        client_token: raw
            .get("client_token")
            .and_then(value_to_string)
            .and_then(|s| Uuid::parse_str(&s).ok()),
        status: raw
            .get("status")
            .and_then(value_to_string)
            .map(OrderStatus::from)
            .unwrap_or(OrderStatus::Pending),
        payment: Payment {
            method: raw
                .get("payment_method")
                .and_then(value_to_string)
                .map(PaymentMethod::from)
                .unwrap_or(PaymentMethod::Cash),
            status: raw
                .get("payment_status")
                .and_then(value_to_string)
                .map(PaymentStatus::from)
                .unwrap_or(PaymentStatus::Pending),
        },
        restaurant_id: pick(raw, &["restaurant", "restaurant_id"]).and_then(value_to_id),
        restaurant_name: raw
            .get("restaurant_name")
            .and_then(value_to_string)
            .or_else(|| {
                restaurant
                    .and_then(|r| r.get("name"))
                    .and_then(value_to_string)
            }),
        items,
        subtotal,
        delivery_fee,
        total_amount,
        delivery_address: pick(raw, &["delivery_address", "shipping_address", "address"])
            .and_then(value_to_string)
            .unwrap_or_default(),
        delivery_phone: pick(raw, &["delivery_phone", "phone"])
            .and_then(value_to_string)
            .unwrap_or_default(),
        pickup_address: raw.get("pickup_address").and_then(value_to_string),
        pickup_phone: raw.get("pickup_phone").and_then(value_to_string),
        notes: raw.get("notes").and_then(value_to_string),
        status_note: pick(raw, &["status_note", "status_message"])
            .and_then(value_to_string)
            .or_else(|| latest_tracking_message(raw)),
        created_at: raw.get("created_at").and_then(parse_timestamp),
        updated_at: raw.get("updated_at").and_then(parse_timestamp),
    }
}

fn normalize_order_item(raw: &Value) -> OrderItem {
    let item = cart::normalize_cart_item(raw);
    OrderItem {
        food_id: item.food_id,
        name: item.name,
        price: item.price,
        quantity: item.quantity,
        notes: item.notes,
    }
}

/// Normalize a raw order listing, paginated or bare.
pub fn normalize_orders(raw: &Value) -> Vec<Order> {
    let list = match raw {
        Value::Array(items) => Some(items),
        _ => pick(raw, &["results", "orders"]).and_then(Value::as_array),
    };
    list.map(|items| items.iter().map(normalize_order).collect())
        .unwrap_or_default()
}

fn id_string(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

fn latest_tracking_message(raw: &Value) -> Option<String> {
    raw.get("tracking")
        .and_then(Value::as_array)
        .and_then(|entries| entries.last())
        .and_then(|entry| entry.get("message"))
        .and_then(value_to_string)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}
