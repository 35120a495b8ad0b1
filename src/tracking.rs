//! Order tracking by polling.
//!
//! A tracker polls the order detail endpoint on a fixed interval and
//! publishes each snapshot on a watch channel. It stops on its own once the
//! order reaches a terminal status, and is meant to be bound to a view's
//! lifetime: start it on focus, drop or [`OrderTracker::stop`] it on blur.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{self, HttpClient};
use crate::models::Order;

pub struct OrderTracker {
    order_id: String,
    receiver: watch::Receiver<Option<Order>>,
    cancel: CancellationToken,
}

impl OrderTracker {
    /// Spawn a poller for `order_id`. The first poll fires immediately.
    pub fn start(http: HttpClient, order_id: impl Into<String>, interval: Duration) -> Self {
        let order_id = order_id.into();
        let (sender, receiver) = watch::channel(None);
        let cancel = CancellationToken::new();

        let task_id = order_id.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            run_poll_loop(http, task_id, interval, sender, task_cancel).await;
        });

        Self {
            order_id,
            receiver,
            cancel,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Most recent snapshot, `None` until the first successful poll.
    pub fn latest(&self) -> Option<Order> {
        self.receiver.borrow().clone()
    }

    /// A receiver for the snapshot stream, for callers that want to await
    /// changes themselves.
    pub fn subscribe(&self) -> watch::Receiver<Option<Order>> {
        self.receiver.clone()
    }

    /// Wait for the next snapshot. Returns `None` once the poller has
    /// stopped, whether by cancellation or a terminal status.
    pub async fn next_update(&mut self) -> Option<Order> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow().clone()
    }

    /// Stop polling. Safe to call more than once.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for OrderTracker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_poll_loop(
    http: HttpClient,
    order_id: String,
    interval: Duration,
    sender: watch::Sender<Option<Order>>,
    cancel: CancellationToken,
) {
    tracing::debug!(order_id, "order tracker started");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(order_id, "order tracker cancelled");
                break;
            }
            _ = ticker.tick() => {}
        }

        match api::orders::detail(&http, &order_id).await {
            Ok(order) => {
                let terminal = order.status.is_terminal();
                if sender.send(Some(order)).is_err() {
                    break;
                }
                if terminal {
                    tracing::debug!(order_id, "order reached a terminal status");
                    break;
                }
            }
            Err(e) => {
                // transient; keep polling until cancelled
                tracing::debug!(order_id, error = %e, "order poll failed");
            }
        }
    }
}
