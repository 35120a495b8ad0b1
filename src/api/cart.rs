use crate::dto::cart::{AddCartItemRequest, UpdateCartItemRequest, normalize_cart};
use crate::error::ClientResult;
use crate::models::Cart;

use super::HttpClient;

pub async fn fetch(http: &HttpClient) -> ClientResult<Cart> {
    let raw = http.get_value("orders/cart/").await?;
    Ok(normalize_cart(&raw))
}

/// Mutations return nothing useful; callers refetch the authoritative cart.
pub async fn add_item(
    http: &HttpClient,
    food_id: i64,
    quantity: u32,
    notes: Option<&str>,
) -> ClientResult<()> {
    let request = AddCartItemRequest {
        food_id,
        quantity,
        notes: notes.map(str::to_string),
    };
    http.post_value("orders/cart/add/", &request).await?;
    Ok(())
}

pub async fn update_item(
    http: &HttpClient,
    item_id: &str,
    quantity: u32,
    notes: Option<&str>,
) -> ClientResult<()> {
    let request = UpdateCartItemRequest {
        quantity,
        notes: notes.map(str::to_string),
    };
    http.put_value(&format!("orders/cart/update/{item_id}/"), &request)
        .await?;
    Ok(())
}

pub async fn remove_item(http: &HttpClient, item_id: &str) -> ClientResult<()> {
    http.delete_value(&format!("orders/cart/remove/{item_id}/"))
        .await?;
    Ok(())
}

pub async fn clear(http: &HttpClient) -> ClientResult<()> {
    http.delete_value("orders/cart/clear/").await?;
    Ok(())
}
