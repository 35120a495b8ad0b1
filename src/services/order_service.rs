use uuid::Uuid;

use crate::api::{self, HttpClient};
use crate::dto::orders::{CheckoutItem, CheckoutRequest, UpdateStatusRequest};
use crate::error::{ClientError, ClientResult};
use crate::lifecycle::{self, OrderAction, Role};
use crate::models::{Cart, Order, PaymentMethod};

/// Order operations for every role.
///
/// Transitions go to the backend, which re-validates them against the same
/// lifecycle table; a rejection leaves the order untouched and surfaces the
/// backend's message. Nothing here mutates state speculatively.
#[derive(Clone)]
pub struct OrderService {
    http: HttpClient,
}

impl OrderService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Place an order from the current cart.
    ///
    /// Validation runs before any network traffic; an incomplete checkout
    /// never produces a half-submitted order. The generated `client_token`
    /// is echoed back by the backend, so the created order can be found
    /// again even if this response is lost.
    pub async fn checkout(
        &self,
        cart: &Cart,
        delivery_address: &str,
        delivery_phone: &str,
        payment_method: PaymentMethod,
        notes: Option<&str>,
    ) -> ClientResult<Order> {
        if cart.is_empty() {
            return Err(ClientError::Validation("cart is empty".to_string()));
        }
        if delivery_address.trim().is_empty() {
            return Err(ClientError::Validation(
                "delivery address is required".to_string(),
            ));
        }
        if delivery_phone.trim().is_empty() {
            return Err(ClientError::Validation(
                "delivery phone is required".to_string(),
            ));
        }

        let request = CheckoutRequest {
            items: cart
                .items
                .iter()
                .map(|item| CheckoutItem {
                    food_id: item.food_id,
                    quantity: item.quantity,
                    notes: item.notes.clone(),
                })
                .collect(),
            delivery_address: delivery_address.trim().to_string(),
            delivery_phone: delivery_phone.trim().to_string(),
            payment_method,
            notes: notes.map(str::to_string),
            client_token: Uuid::new_v4(),
        };
        let order = api::orders::create(&self.http, &request).await?;
        tracing::info!(order_id = %order.id, token = %request.client_token, "order created");
        Ok(order)
    }

    /// Locate a just-created order by its correlation token.
    pub async fn find_by_token(&self, token: Uuid) -> ClientResult<Option<Order>> {
        let orders = api::orders::my_orders(&self.http).await?;
        Ok(orders.into_iter().find(|o| o.client_token == Some(token)))
    }

    pub async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        api::orders::my_orders(&self.http).await
    }

    pub async fn order(&self, order_id: &str) -> ClientResult<Order> {
        api::orders::detail(&self.http, order_id).await
    }

    /// Orders waiting for a shipper. Always scoped to `ready`.
    pub async fn available_orders(&self) -> ClientResult<Vec<Order>> {
        api::orders::available(&self.http).await
    }

    pub async fn shipper_orders(&self) -> ClientResult<Vec<Order>> {
        api::orders::shipper_orders(&self.http).await
    }

    /// Apply one lifecycle action to an order.
    ///
    /// `message` overrides the action's default progress note.
    pub async fn advance(
        &self,
        order_id: &str,
        action: OrderAction,
        message: Option<&str>,
    ) -> ClientResult<Order> {
        let request = UpdateStatusRequest {
            action,
            message: Some(
                message
                    .map(str::to_string)
                    .unwrap_or_else(|| action.progress_message().to_string()),
            ),
        };
        let order = api::orders::update_status(&self.http, order_id, &request).await?;
        tracing::info!(order_id, action = %action, status = %order.status, "order advanced");
        Ok(order)
    }

    pub async fn confirm(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::Confirm, None).await
    }

    pub async fn start_preparing(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::StartPreparing, None)
            .await
    }

    pub async fn mark_ready(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::MarkReady, None).await
    }

    /// Claim a ready order for delivery. Losing the race to another shipper
    /// surfaces as [`ClientError::OrderTaken`].
    pub async fn accept(&self, order_id: &str) -> ClientResult<Order> {
        api::orders::accept(&self.http, order_id).await
    }

    pub async fn pick_up(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::PickUp, None).await
    }

    pub async fn start_delivering(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::StartDelivering, None)
            .await
    }

    pub async fn deliver(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::Deliver, None).await
    }

    pub async fn complete(&self, order_id: &str) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::Complete, None).await
    }

    /// Cancel `order` as `role`, resolving the role's cancel action from the
    /// lifecycle table first so an impossible cancel fails without a request.
    pub async fn cancel(
        &self,
        order: &Order,
        role: Role,
        reason: Option<&str>,
    ) -> ClientResult<Order> {
        let action = lifecycle::cancel_action(role, &order.status).ok_or_else(|| {
            ClientError::Validation(format!(
                "a {role} cannot cancel an order that is {}",
                order.status.label()
            ))
        })?;
        self.advance(&order.id, action, reason).await
    }

    /// Report a delivery that could not be completed.
    pub async fn fail_delivery(&self, order_id: &str, reason: Option<&str>) -> ClientResult<Order> {
        self.advance(order_id, OrderAction::FailDelivery, reason)
            .await
    }
}
