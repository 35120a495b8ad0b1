use serde_json::Value;

use crate::models::{Food, Restaurant};

use super::{pick, value_to_decimal, value_to_id, value_to_string};

/// Normalize a raw food payload. Returns `None` without an id, since a food
/// that cannot be referenced is useless to the cart.
///
/// `current_price` already has any discount applied, so it wins over the
/// base `price` when both are present.
pub fn normalize_food(raw: &Value) -> Option<Food> {
    let id = raw.get("id").and_then(super::value_to_i64)?;
    Some(Food {
        id,
        name: raw.get("name").and_then(value_to_string).unwrap_or_default(),
        price: pick(raw, &["current_price", "price"])
            .and_then(value_to_decimal)
            .unwrap_or_default(),
        image: pick(raw, &["image", "image_url"]).and_then(value_to_string),
        restaurant_id: pick(raw, &["restaurant", "restaurant_id"]).and_then(value_to_id),
        is_available: pick(raw, &["is_available", "available"])
            .and_then(Value::as_bool)
            .unwrap_or(true),
    })
}

/// Normalize a raw food listing, paginated, `{"results": [...]}` or bare.
pub fn normalize_foods(raw: &Value) -> Vec<Food> {
    list_of(raw)
        .map(|items| items.iter().filter_map(normalize_food).collect())
        .unwrap_or_default()
}

pub fn normalize_restaurant(raw: &Value) -> Option<Restaurant> {
    let id = raw.get("id").and_then(super::value_to_i64)?;
    Some(Restaurant {
        id,
        name: raw.get("name").and_then(value_to_string).unwrap_or_default(),
        address: raw.get("address").and_then(value_to_string),
        phone: raw.get("phone").and_then(value_to_string),
        image: pick(raw, &["logo", "image", "cover_image"]).and_then(value_to_string),
        rating: raw.get("rating").and_then(value_to_decimal),
        is_open: raw
            .get("is_open")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    })
}

pub fn normalize_restaurants(raw: &Value) -> Vec<Restaurant> {
    list_of(raw)
        .map(|items| items.iter().filter_map(normalize_restaurant).collect())
        .unwrap_or_default()
}

fn list_of(raw: &Value) -> Option<&Vec<Value>> {
    match raw {
        Value::Array(items) => Some(items),
        _ => raw.get("results").and_then(Value::as_array),
    }
}
