use crate::api::{self, HttpClient};
use crate::dto::auth::UpdateProfileRequest;
use crate::error::{ClientError, ClientResult};
use crate::models::UserProfile;

/// Session lifecycle: login, restore, logout, profile.
///
/// Tokens are persisted by the HTTP client; this service owns when a session
/// starts and ends. The one-time guest-cart merge runs at the facade level,
/// right after either `login` or a successful `restore`.
#[derive(Clone)]
pub struct AuthService {
    http: HttpClient,
}

impl AuthService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Exchange credentials for a token pair and load the profile.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserProfile> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "username and password are required".to_string(),
            ));
        }
        let tokens = api::auth::login(&self.http, username, password).await?;
        self.http
            .set_tokens(&tokens.access, Some(&tokens.refresh))
            .await?;
        let profile = api::auth::profile(&self.http).await?;
        tracing::info!(username = %profile.username, "logged in");
        Ok(profile)
    }

    /// Adopt a persisted session, if there is one that still works.
    ///
    /// A stale token pair reads as "not logged in", not as an error; the
    /// HTTP client has already dropped the tokens by then.
    pub async fn restore(&self) -> ClientResult<Option<UserProfile>> {
        if !self.http.has_token().await {
            return Ok(None);
        }
        match api::auth::profile(&self.http).await {
            Ok(profile) => {
                tracing::debug!(username = %profile.username, "session restored");
                Ok(Some(profile))
            }
            Err(e) if e.is_auth() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// End the session locally. No network; the backend's tokens just expire.
    pub async fn logout(&self) -> ClientResult<()> {
        self.http.clear_tokens().await?;
        tracing::info!("logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.http.has_token().await
    }

    pub async fn profile(&self) -> ClientResult<UserProfile> {
        api::auth::profile(&self.http).await
    }

    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> ClientResult<UserProfile> {
        api::auth::update_profile(&self.http, update).await
    }
}
