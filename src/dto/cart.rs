use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::{Cart, CartItem};

use super::{pick, value_to_decimal, value_to_id, value_to_string, value_to_u32};

#[derive(Debug, Serialize)]
pub struct AddCartItemRequest {
    pub food_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Normalize any raw cart payload into a [`Cart`].
///
/// Item lists arrive under `items`, a paginated `results`, or nested as
/// `cart.items` depending on the endpoint. Totals are always recomputed from
/// the items; whatever totals the payload carried are ignored.
pub fn normalize_cart(raw: &Value) -> Cart {
    let items = pick(raw, &["items", "results"])
        .or_else(|| raw.get("cart").and_then(|c| c.get("items")))
        .and_then(Value::as_array)
        .map(|raw_items| raw_items.iter().map(normalize_cart_item).collect())
        .unwrap_or_default();
    Cart::from_items(items)
}

/// Normalize one raw cart line.
///
/// Field names vary between the guest and server representations, so each
/// field is resolved through a fallback chain and coerced, never failing:
/// unusable money parses as zero, a missing quantity means one.
pub fn normalize_cart_item(raw: &Value) -> CartItem {
    let food = raw.get("food").filter(|f| f.is_object());

    let food_id = pick(raw, &["food_id", "food", "foodId"])
        .and_then(value_to_id)
        .unwrap_or_default();

    let name = pick(raw, &["food_name", "name"])
        .and_then(value_to_string)
        .or_else(|| food.and_then(|f| f.get("name")).and_then(value_to_string))
        .unwrap_or_default();

    let price = pick(raw, &["price", "unit_price"])
        .or_else(|| food.and_then(|f| f.get("price")))
        .map(|v| value_to_decimal(v).unwrap_or_default())
        .unwrap_or_default();

    let quantity = pick(raw, &["quantity", "qty", "quantity_value"])
        .map(|v| value_to_u32(v).unwrap_or_default())
        .unwrap_or(1);

    let id = raw
        .get("id")
        .and_then(|v| match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("guest-{}", Uuid::new_v4()));

    CartItem {
        id,
        food_id,
        name,
        price,
        quantity,
        notes: raw.get("notes").and_then(value_to_string),
    }
}
