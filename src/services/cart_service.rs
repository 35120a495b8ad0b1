use futures::future::join_all;

use crate::api::{self, HttpClient};
use crate::dto::cart::normalize_cart;
use crate::error::{ClientError, ClientResult};
use crate::models::{Cart, CartItem};
use crate::store::{GUEST_CART_KEY, Store};

/// Outcome of merging the guest cart into the server cart.
///
/// Items that failed to merge stay in local storage so nothing is silently
/// lost; callers can retry them or show them to the user.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub merged: Vec<CartItem>,
    pub failed: Vec<MergeFailure>,
}

#[derive(Debug, Clone)]
pub struct MergeFailure {
    pub item: CartItem,
    pub reason: String,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.merged.is_empty() && self.failed.is_empty()
    }
}

/// Cart operations across the guest and authenticated worlds.
///
/// While unauthenticated the cart lives in local storage; once a session
/// exists the server cart is the sole source of truth and every mutation
/// refetches it. Either way callers get back a normalized [`Cart`] with
/// freshly computed totals.
#[derive(Clone)]
pub struct CartService {
    http: HttpClient,
    store: Store,
}

impl CartService {
    pub fn new(http: HttpClient, store: Store) -> Self {
        Self { http, store }
    }

    /// Current cart.
    ///
    /// An authenticated fetch that fails with an auth error silently falls
    /// back to the guest cart; an expired session should read as "your local
    /// cart" rather than an error screen.
    pub async fn fetch(&self) -> ClientResult<Cart> {
        if !self.http.has_token().await {
            return self.guest_cart().await;
        }
        match api::cart::fetch(&self.http).await {
            Ok(cart) => Ok(cart),
            Err(e) if e.is_auth() => {
                tracing::debug!(error = %e, "cart fetch unauthorized, using guest cart");
                self.guest_cart().await
            }
            Err(e) => Err(e),
        }
    }

    /// The locally stored guest cart, normalized. Missing or unreadable
    /// storage yields an empty cart.
    pub async fn guest_cart(&self) -> ClientResult<Cart> {
        let raw = self.store.get_json(GUEST_CART_KEY).await?;
        Ok(raw.map(|v| normalize_cart(&v)).unwrap_or_default())
    }

    /// Add `quantity` of a food to the cart.
    ///
    /// Guest carts upsert by `food_id`, fetching the food's name and price
    /// on first add. Authenticated carts delegate to the backend and refetch.
    pub async fn add_item(
        &self,
        food_id: i64,
        quantity: u32,
        notes: Option<&str>,
    ) -> ClientResult<Cart> {
        if quantity == 0 {
            return Err(ClientError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        if self.http.has_token().await {
            api::cart::add_item(&self.http, food_id, quantity, notes).await?;
            return api::cart::fetch(&self.http).await;
        }

        let mut cart = self.guest_cart().await?;
        match cart.items.iter_mut().find(|i| i.food_id == food_id) {
            Some(item) => {
                item.quantity += quantity;
                if notes.is_some() {
                    item.notes = notes.map(str::to_string);
                }
            }
            None => {
                let food = api::catalog::food(&self.http, food_id).await?;
                let mut item = CartItem::guest(food.id, food.name, food.price, quantity);
                item.notes = notes.map(str::to_string);
                cart.items.push(item);
            }
        }
        self.persist_guest(cart).await
    }

    /// Set an item's quantity and optionally its notes. Zero removes the
    /// item.
    pub async fn update_item(
        &self,
        item_id: &str,
        quantity: u32,
        notes: Option<&str>,
    ) -> ClientResult<Cart> {
        if quantity == 0 {
            return self.remove_item(item_id).await;
        }

        if self.http.has_token().await {
            api::cart::update_item(&self.http, item_id, quantity, notes).await?;
            return api::cart::fetch(&self.http).await;
        }

        let mut cart = self.guest_cart().await?;
        let item = cart
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ClientError::NotFound(format!("cart item {item_id}")))?;
        item.quantity = quantity;
        if notes.is_some() {
            item.notes = notes.map(str::to_string);
        }
        self.persist_guest(cart).await
    }

    pub async fn remove_item(&self, item_id: &str) -> ClientResult<Cart> {
        if self.http.has_token().await {
            api::cart::remove_item(&self.http, item_id).await?;
            return api::cart::fetch(&self.http).await;
        }

        let mut cart = self.guest_cart().await?;
        let before = cart.items.len();
        cart.items.retain(|i| i.id != item_id);
        if cart.items.len() == before {
            return Err(ClientError::NotFound(format!("cart item {item_id}")));
        }
        self.persist_guest(cart).await
    }

    pub async fn clear(&self) -> ClientResult<Cart> {
        if self.http.has_token().await {
            api::cart::clear(&self.http).await?;
            return api::cart::fetch(&self.http).await;
        }
        self.store.remove(GUEST_CART_KEY).await?;
        Ok(Cart::default())
    }

    /// One-time transfer of the guest cart into the server cart after login.
    ///
    /// Items are pushed individually and the results collected, so one bad
    /// line does not void the rest. Successfully merged items leave local
    /// storage; failed ones stay behind for a later retry. With an empty
    /// guest cart this is a no-op, which also makes a second call after a
    /// clean merge harmless.
    pub async fn merge_guest_cart(&self) -> ClientResult<MergeReport> {
        let guest = self.guest_cart().await?;
        if guest.is_empty() {
            return Ok(MergeReport::default());
        }
        if !self.http.has_token().await {
            tracing::debug!("merge requested without a session, keeping guest cart");
            return Ok(MergeReport::default());
        }

        let attempts = guest.items.iter().map(|item| {
            let http = self.http.clone();
            async move {
                api::cart::add_item(&http, item.food_id, item.quantity, item.notes.as_deref())
                    .await
            }
        });
        let outcomes = join_all(attempts).await;

        let mut report = MergeReport::default();
        for (item, outcome) in guest.items.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.merged.push(item),
                Err(e) => {
                    tracing::warn!(food_id = item.food_id, error = %e, "cart item failed to merge");
                    report.failed.push(MergeFailure {
                        item,
                        reason: e.user_message(),
                    });
                }
            }
        }

        if report.failed.is_empty() {
            self.store.remove(GUEST_CART_KEY).await?;
        } else {
            let leftover = Cart::from_items(report.failed.iter().map(|f| f.item.clone()).collect());
            self.store.set_json(GUEST_CART_KEY, &leftover).await?;
        }

        tracing::info!(
            merged = report.merged.len(),
            failed = report.failed.len(),
            "guest cart merge finished"
        );
        Ok(report)
    }

    async fn persist_guest(&self, mut cart: Cart) -> ClientResult<Cart> {
        cart.recompute();
        self.store.set_json(GUEST_CART_KEY, &cart).await?;
        Ok(cart)
    }
}
