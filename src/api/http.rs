use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::dto::auth::{RefreshRequest, RefreshResponse};
use crate::error::{ClientError, ClientResult};
use crate::response::extract_error_message;
use crate::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, Store};

const REFRESH_PATH: &str = "auth/token/refresh/";

/// JSON transport to the backend.
///
/// Attaches the bearer token when one is known, maps error statuses onto
/// typed [`ClientError`] variants, and transparently refreshes an expired
/// access token once before giving up on a request. Cheap to clone; clones
/// share the token state.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Arc<RwLock<Option<String>>>,
    store: Store,
}

impl HttpClient {
    pub fn new(config: &AppConfig, store: Store) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: Arc::new(RwLock::new(None)),
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Current access token, falling back to the persisted one.
    pub async fn access_token(&self) -> Option<String> {
        if let Some(token) = self.access_token.read().await.clone() {
            return Some(token);
        }
        let persisted = self.store.get_string(ACCESS_TOKEN_KEY).await.ok()??;
        *self.access_token.write().await = Some(persisted.clone());
        Some(persisted)
    }

    pub async fn has_token(&self) -> bool {
        self.access_token().await.is_some()
    }

    /// Adopt and persist a fresh token pair.
    pub async fn set_tokens(&self, access: &str, refresh: Option<&str>) -> ClientResult<()> {
        self.store.set_string(ACCESS_TOKEN_KEY, access).await?;
        if let Some(refresh) = refresh {
            self.store.set_string(REFRESH_TOKEN_KEY, refresh).await?;
        }
        *self.access_token.write().await = Some(access.to_string());
        Ok(())
    }

    /// Drop both tokens, in memory and on disk.
    pub async fn clear_tokens(&self) -> ClientResult<()> {
        self.store.remove(ACCESS_TOKEN_KEY).await?;
        self.store.remove(REFRESH_TOKEN_KEY).await?;
        *self.access_token.write().await = None;
        Ok(())
    }

    pub async fn get_value(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_value<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body)).await
    }

    pub async fn post_empty(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::POST, path, None).await
    }

    pub async fn put_value<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(&body)).await
    }

    pub async fn delete_value(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::DELETE, path, None).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.get_value(path).await?;
        serde_json::from_value(value).map_err(Into::into)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let value = self.post_value(path, body).await?;
        serde_json::from_value(value).map_err(Into::into)
    }

    /// Send a request, refreshing the access token once on a 401.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        match self.attempt(method.clone(), path, body).await {
            Err(ClientError::Unauthorized) if path != REFRESH_PATH => {
                if self.refresh_access_token().await {
                    self.attempt(method, path, body).await
                } else {
                    Err(ClientError::Unauthorized)
                }
            }
            other => other,
        }
    }

    async fn attempt(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "request");
        let mut request = self.client.request(method, &url);
        if let Some(token) = self.access_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text);
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST => ClientError::Rejected(message),
                StatusCode::CONFLICT => ClientError::Conflict(message),
                _ => ClientError::Server(message),
            });
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("bad json from backend: {e}")))
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns false when there is nothing to refresh or the exchange fails;
    /// in the failure case both tokens are dropped so the session degrades
    /// to guest cleanly.
    async fn refresh_access_token(&self) -> bool {
        let Ok(Some(refresh)) = self.store.get_string(REFRESH_TOKEN_KEY).await else {
            return false;
        };
        let url = self.url(REFRESH_PATH);
        let outcome = async {
            let response = self
                .client
                .post(&url)
                .json(&RefreshRequest { refresh })
                .send()
                .await?;
            let value = Self::handle_response(response).await?;
            let refreshed: RefreshResponse = serde_json::from_value(value)?;
            self.set_tokens(&refreshed.access, refreshed.refresh.as_deref())
                .await?;
            Ok::<_, ClientError>(())
        }
        .await;
        match outcome {
            Ok(()) => {
                tracing::debug!("access token refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, dropping session");
                if let Err(e) = self.clear_tokens().await {
                    tracing::warn!(error = %e, "failed to clear tokens");
                }
                false
            }
        }
    }
}
