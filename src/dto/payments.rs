use serde_json::Value;

use crate::models::PaymentMethod;

use super::{pick, value_to_string};

/// Normalize the available-methods payload into method codes.
///
/// The endpoint wraps its list as `{"success": true, "methods": [...]}` with
/// entries that are either plain strings or objects carrying `id`/`code`.
/// Entries explicitly disabled are dropped.
pub fn normalize_payment_methods(raw: &Value) -> Vec<PaymentMethod> {
    let list = match raw {
        Value::Array(items) => Some(items),
        _ => pick(raw, &["methods", "results"]).and_then(Value::as_array),
    };
    list.map(|entries| {
        entries
            .iter()
            .filter(|entry| {
                entry
                    .get("enabled")
                    .and_then(Value::as_bool)
                    .unwrap_or(true)
            })
            .filter_map(method_code)
            .map(PaymentMethod::from)
            .collect()
    })
    .unwrap_or_default()
}

fn method_code(entry: &Value) -> Option<String> {
    match entry {
        Value::String(code) if !code.is_empty() => Some(code.clone()),
        Value::Object(_) => pick(entry, &["id", "code"]).and_then(value_to_string),
        _ => None,
    }
}
