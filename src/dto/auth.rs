use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lifecycle::Role;
use crate::models::UserProfile;

use super::{pick, value_to_i64, value_to_string};

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token pair issued at login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response. `refresh` is present only when the backend rotates it.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Normalize a profile payload. Roles this client does not know map to
/// `None` instead of failing the decode.
pub fn normalize_profile(raw: &Value) -> UserProfile {
    let role = raw
        .get("role")
        .and_then(value_to_string)
        .and_then(|r| match r.as_str() {
            "seller" => Some(Role::Seller),
            "shipper" => Some(Role::Shipper),
            "customer" => Some(Role::Customer),
            _ => None,
        });
    UserProfile {
        id: raw.get("id").and_then(value_to_i64).unwrap_or_default(),
        username: raw
            .get("username")
            .and_then(value_to_string)
            .unwrap_or_default(),
        email: raw.get("email").and_then(value_to_string),
        role,
        phone: pick(raw, &["phone", "phone_number"]).and_then(value_to_string),
        address: raw.get("address").and_then(value_to_string),
    }
}
