//! Top-level client facade.
//!
//! Wires the storage layer, the HTTP transport, and the domain services
//! together behind one handle. Construct it once per app and hand out the
//! service references.

use uuid::Uuid;

use crate::api::{self, HttpClient};
use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::models::{Food, Notification, PaymentMethod, Restaurant, UserProfile};
use crate::services::{AuthService, CartService, MergeReport, OrderService};
use crate::store::Store;
use crate::tracking::OrderTracker;

/// What a successful login produced: the profile, and the report of the
/// guest cart merge that runs on every login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub profile: UserProfile,
    pub merge: MergeReport,
}

pub struct Client {
    config: AppConfig,
    http: HttpClient,
    auth: AuthService,
    cart: CartService,
    orders: OrderService,
}

impl Client {
    /// Build a client persisting tokens and the guest cart under
    /// `config.data_dir`.
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let store = Store::file(config.data_dir.clone());
        Self::with_store(config, store)
    }

    /// Build a client over an explicit store. Tests pass
    /// [`Store::memory`](crate::store::Store::memory) here.
    pub fn with_store(config: AppConfig, store: Store) -> ClientResult<Self> {
        let http = HttpClient::new(&config, store.clone())?;
        let auth = AuthService::new(http.clone());
        let cart = CartService::new(http.clone(), store);
        let orders = OrderService::new(http.clone());
        Ok(Self {
            config,
            http,
            auth,
            cart,
            orders,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn cart(&self) -> &CartService {
        &self.cart
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// Log in and fold the guest cart into the server cart. Items the server
    /// refuses stay in the local guest cart; see the returned
    /// [`MergeReport`].
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome> {
        let profile = self.auth.login(username, password).await?;
        let merge = self.cart.merge_guest_cart().await?;
        Ok(LoginOutcome { profile, merge })
    }

    /// Restore a previous session from stored tokens, if any.
    ///
    /// A restored session crosses the same guest-to-authenticated edge as a
    /// login, so the merge runs here too. Leftovers from an earlier partial
    /// merge get their retry; with an empty guest cart it is a no-op.
    pub async fn restore(&self) -> ClientResult<Option<LoginOutcome>> {
        let Some(profile) = self.auth.restore().await? else {
            return Ok(None);
        };
        let merge = self.cart.merge_guest_cart().await?;
        Ok(Some(LoginOutcome { profile, merge }))
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.auth.logout().await
    }

    pub async fn food(&self, food_id: i64) -> ClientResult<Food> {
        api::catalog::food(&self.http, food_id).await
    }

    pub async fn restaurants(&self) -> ClientResult<Vec<Restaurant>> {
        api::catalog::restaurants(&self.http).await
    }

    pub async fn restaurant_foods(&self, restaurant_id: i64) -> ClientResult<Vec<Food>> {
        api::catalog::restaurant_foods(&self.http, restaurant_id).await
    }

    pub async fn search_foods(&self, query: &str) -> ClientResult<Vec<Food>> {
        api::catalog::search_foods(&self.http, query).await
    }

    /// Payment methods the backend currently offers. Falls back to the
    /// built-in set when the endpoint is unreachable.
    pub async fn payment_methods(&self) -> ClientResult<Vec<PaymentMethod>> {
        api::payments::available_methods(&self.http).await
    }

    pub async fn notifications(&self) -> ClientResult<Vec<Notification>> {
        api::notifications::list(&self.http).await
    }

    pub async fn unread_notifications(&self) -> ClientResult<u64> {
        api::notifications::unread_count(&self.http).await
    }

    pub async fn mark_notification_read(&self, notification_id: i64) -> ClientResult<()> {
        api::notifications::mark_read(&self.http, notification_id).await
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<()> {
        api::notifications::mark_all_read(&self.http).await
    }

    /// Start polling `order_id` at the configured interval. The tracker
    /// stops itself once the order reaches a terminal status.
    pub fn track_order(&self, order_id: impl Into<String>) -> OrderTracker {
        OrderTracker::start(self.http.clone(), order_id, self.config.poll_interval)
    }

    /// Look an order up by the client token attached at checkout.
    pub async fn order_by_token(&self, token: Uuid) -> ClientResult<Option<crate::models::Order>> {
        self.orders.find_by_token(token).await
    }
}
