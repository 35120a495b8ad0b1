use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::models::Notification;

use super::{pick, value_to_i64, value_to_string};

/// Normalize a raw notification listing, paginated or bare.
pub fn normalize_notifications(raw: &Value) -> Vec<Notification> {
    let list = match raw {
        Value::Array(items) => Some(items),
        _ => pick(raw, &["results", "notifications"]).and_then(Value::as_array),
    };
    list.map(|entries| entries.iter().filter_map(normalize_notification).collect())
        .unwrap_or_default()
}

fn normalize_notification(raw: &Value) -> Option<Notification> {
    let id = raw.get("id").and_then(value_to_i64)?;
    Some(Notification {
        id,
        title: raw
            .get("title")
            .and_then(value_to_string)
            .unwrap_or_default(),
        message: pick(raw, &["message", "body"])
            .and_then(value_to_string)
            .unwrap_or_default(),
        is_read: pick(raw, &["is_read", "read"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at: raw.get("created_at").and_then(|v| {
            v.as_str().and_then(|s| {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            })
        }),
    })
}

/// Unread counter payload, under whichever key the backend chose.
pub fn normalize_unread_count(raw: &Value) -> u64 {
    pick(raw, &["unread_count", "count", "unread"])
        .and_then(value_to_i64)
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}
