use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by client operations.
///
/// HTTP status codes from the backend are mapped onto typed variants as soon
/// as a response is read, so callers match on variants instead of inspecting
/// status codes.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("authentication required")]
    Unauthorized,

    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The backend refused the request as invalid (HTTP 400).
    #[error("rejected: {0}")]
    Rejected(String),

    /// Another shipper accepted the order first (HTTP 409 on accept).
    #[error("order no longer available")]
    OrderTaken,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Client-side validation failed before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ClientError {
    /// True for errors caused by missing or expired credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::Forbidden(_))
    }

    /// A short message suitable for showing to an end user verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Could not reach the server. Check your connection.".into(),
            ClientError::Unauthorized => "Please log in to continue.".into(),
            ClientError::OrderTaken => "This order is no longer available.".into(),
            ClientError::Rejected(msg)
            | ClientError::Forbidden(msg)
            | ClientError::Conflict(msg) => msg.clone(),
            ClientError::NotFound(what) => format!("{what} was not found."),
            ClientError::Validation(msg) => msg.clone(),
            _ => "Something went wrong. Please try again.".into(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
