use crate::dto::notifications::{normalize_notifications, normalize_unread_count};
use crate::error::ClientResult;
use crate::models::Notification;

use super::HttpClient;

pub async fn list(http: &HttpClient) -> ClientResult<Vec<Notification>> {
    let raw = http.get_value("notifications/").await?;
    Ok(normalize_notifications(&raw))
}

pub async fn unread_count(http: &HttpClient) -> ClientResult<u64> {
    let raw = http.get_value("notifications/unread-count/").await?;
    Ok(normalize_unread_count(&raw))
}

pub async fn mark_read(http: &HttpClient, notification_id: i64) -> ClientResult<()> {
    http.post_empty(&format!("notifications/{notification_id}/read/"))
        .await?;
    Ok(())
}

pub async fn mark_all_read(http: &HttpClient) -> ClientResult<()> {
    http.post_empty("notifications/mark-all-read/").await?;
    Ok(())
}
