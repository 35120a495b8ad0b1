//! Request bodies and tolerant response decoding.
//!
//! The backend's payload shapes drift between endpoints (nested food objects
//! vs. bare ids, string vs. numeric money, renamed keys), so responses are
//! decoded from raw JSON with the coercion helpers here and normalized into
//! the models once, at the edge.

use rust_decimal::Decimal;
use serde_json::Value;

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod notifications;
pub mod orders;
pub mod payments;

/// Integer out of a JSON number, numeric string, or float. `None` otherwise.
pub(crate) fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

/// Quantity-style coercion. Negative values clamp to zero.
pub(crate) fn value_to_u32(value: &Value) -> Option<u32> {
    value_to_i64(value).map(|n| n.max(0) as u32)
}

/// Money out of a JSON number or numeric string. `None` otherwise.
pub(crate) fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Non-empty string field, owned.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// An id that may arrive as a number, a numeric string, or an object
/// carrying its own `id` field.
pub(crate) fn value_to_id(value: &Value) -> Option<i64> {
    match value {
        Value::Object(map) => map.get("id").and_then(value_to_i64),
        other => value_to_i64(other),
    }
}

/// First present key out of `keys`, in priority order.
pub(crate) fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| value.get(k))
        .find(|v| !v.is_null())
}
