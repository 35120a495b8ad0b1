use crate::dto::auth::{LoginRequest, LoginResponse, UpdateProfileRequest, normalize_profile};
use crate::error::ClientResult;
use crate::models::UserProfile;

use super::HttpClient;

pub async fn login(
    http: &HttpClient,
    username: &str,
    password: &str,
) -> ClientResult<LoginResponse> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    http.post("auth/login/", &request).await
}

pub async fn profile(http: &HttpClient) -> ClientResult<UserProfile> {
    let raw = http.get_value("auth/profile/").await?;
    Ok(normalize_profile(&raw))
}

pub async fn update_profile(
    http: &HttpClient,
    update: &UpdateProfileRequest,
) -> ClientResult<UserProfile> {
    let raw = http.put_value("auth/profile/", update).await?;
    Ok(normalize_profile(&raw))
}
