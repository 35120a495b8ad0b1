use crate::dto::catalog::{normalize_food, normalize_foods, normalize_restaurants};
use crate::error::{ClientError, ClientResult};
use crate::models::{Food, Restaurant};

use super::HttpClient;

/// Food detail, used to enrich guest-cart lines with name and price.
pub async fn food(http: &HttpClient, food_id: i64) -> ClientResult<Food> {
    let raw = http
        .get_value(&format!("restaurants/foods/{food_id}/"))
        .await?;
    normalize_food(&raw)
        .ok_or_else(|| ClientError::InvalidResponse("food payload carries no id".to_string()))
}

pub async fn restaurants(http: &HttpClient) -> ClientResult<Vec<Restaurant>> {
    let raw = http.get_value("restaurants/").await?;
    Ok(normalize_restaurants(&raw))
}

pub async fn restaurant_foods(http: &HttpClient, restaurant_id: i64) -> ClientResult<Vec<Food>> {
    let raw = http
        .get_value(&format!("restaurants/{restaurant_id}/foods/"))
        .await?;
    Ok(normalize_foods(&raw))
}

/// Name search over available foods. An empty query returns nothing without
/// asking the backend, matching its own behavior.
pub async fn search_foods(http: &HttpClient, query: &str) -> ClientResult<Vec<Food>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let raw = http
        .get_value(&format!("restaurants/foods/search/?q={query}"))
        .await?;
    Ok(normalize_foods(&raw))
}
