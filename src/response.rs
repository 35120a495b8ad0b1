use serde::Deserialize;

/// One page of a DRF-style paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A listing endpoint response.
///
/// The backend returns either a paginated envelope or a bare array depending
/// on the view, so list calls deserialize into this and flatten with
/// [`ListResponse::into_items`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated(page) => page.results,
            ListResponse::Plain(items) => items,
        }
    }
}

/// Error payload shapes the backend uses interchangeably.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

/// Pull a human-readable message out of an error response body.
///
/// Falls back to the raw body (truncated) when it is not JSON or carries
/// none of the known keys.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.error.or(parsed.detail).or(parsed.message) {
            return msg;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
