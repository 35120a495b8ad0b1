use crate::dto::orders::{
    CheckoutRequest, UpdateStatusRequest, normalize_order, normalize_orders,
};
use crate::error::{ClientError, ClientResult};
use crate::models::Order;

use super::HttpClient;

pub async fn create(http: &HttpClient, request: &CheckoutRequest) -> ClientResult<Order> {
    let raw = http.post_value("orders/orders/create/", request).await?;
    Ok(normalize_order(&raw))
}

pub async fn my_orders(http: &HttpClient) -> ClientResult<Vec<Order>> {
    let raw = http.get_value("orders/orders/my/").await?;
    Ok(normalize_orders(&raw))
}

pub async fn detail(http: &HttpClient, order_id: &str) -> ClientResult<Order> {
    let raw = http.get_value(&format!("orders/orders/{order_id}/")).await?;
    Ok(normalize_order(&raw))
}

pub async fn update_status(
    http: &HttpClient,
    order_id: &str,
    request: &UpdateStatusRequest,
) -> ClientResult<Order> {
    let raw = http
        .post_value(&format!("orders/{order_id}/update-status/"), request)
        .await?;
    Ok(normalize_order(&raw))
}

/// Orders a shipper can take. The listing is always queried at `ready`;
/// earlier statuses belong to the restaurant and later ones to a shipper
/// who already holds the order.
pub async fn available(http: &HttpClient) -> ClientResult<Vec<Order>> {
    let raw = http
        .get_value("orders/shipper/orders/available/?status=ready")
        .await?;
    Ok(normalize_orders(&raw))
}

/// Claim an order. The backend swaps the shipper in atomically; losing the
/// race surfaces as [`ClientError::OrderTaken`].
pub async fn accept(http: &HttpClient, order_id: &str) -> ClientResult<Order> {
    let raw = http
        .post_empty(&format!("orders/shipper/orders/{order_id}/accept/"))
        .await
        .map_err(|e| match e {
            ClientError::Conflict(_) | ClientError::Rejected(_) => ClientError::OrderTaken,
            other => other,
        })?;
    Ok(normalize_order(&raw))
}

pub async fn shipper_orders(http: &HttpClient) -> ClientResult<Vec<Order>> {
    let raw = http.get_value("orders/shipper/orders/my/").await?;
    Ok(normalize_orders(&raw))
}
