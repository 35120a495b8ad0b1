//! Order lifecycle state machine.
//!
//! Single source of truth for which role may do what to an order in a given
//! status. Every screen-level decision (which button to show, whether a
//! cancel is still possible) goes through the lookups here instead of
//! carrying its own copy of the rules.
//!
//! The canonical path is
//! `pending -> confirmed -> preparing -> ready -> assigned -> picked_up ->
//! delivering -> delivered -> completed`, with role-scoped cancellations
//! branching off into terminal states. The backend enforces the same table;
//! these lookups exist so the client never offers an action the backend
//! would refuse.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An action applied to an order in a status it may not start from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} an order that is {status}")]
pub struct IllegalTransition {
    pub action: OrderAction,
    pub status: OrderStatus,
}

/// Order status as reported by the backend.
///
/// Unrecognized values are preserved in `Unknown` rather than failing
/// deserialization, so a newer backend cannot break older clients. Label and
/// color lookups stay total for the same reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Assigned,
    PickedUp,
    Delivering,
    Delivered,
    Completed,
    CancelledByUser,
    CancelledBySeller,
    CancelledByShipper,
    FailedDelivery,
    Unknown(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Assigned => "assigned",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::CancelledByUser => "cancelled_by_user",
            OrderStatus::CancelledBySeller => "cancelled_by_seller",
            OrderStatus::CancelledByShipper => "cancelled_by_shipper",
            OrderStatus::FailedDelivery => "failed_delivery",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// Human-readable status label. Unknown statuses render verbatim.
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending confirmation",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready for pickup",
            OrderStatus::Assigned => "Shipper assigned",
            OrderStatus::PickedUp => "Picked up",
            OrderStatus::Delivering => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Completed => "Completed",
            OrderStatus::CancelledByUser => "Cancelled by customer",
            OrderStatus::CancelledBySeller => "Cancelled by restaurant",
            OrderStatus::CancelledByShipper => "Cancelled by shipper",
            OrderStatus::FailedDelivery => "Delivery failed",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// Display color as a hex string. Unknown statuses get a neutral grey.
    pub fn color(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "#ff9800",
            OrderStatus::Confirmed => "#2196f3",
            OrderStatus::Preparing => "#673ab7",
            OrderStatus::Ready => "#4caf50",
            OrderStatus::Assigned => "#00bcd4",
            OrderStatus::PickedUp => "#009688",
            OrderStatus::Delivering => "#009688",
            OrderStatus::Delivered => "#8bc34a",
            OrderStatus::Completed => "#4caf50",
            OrderStatus::CancelledByUser
            | OrderStatus::CancelledBySeller
            | OrderStatus::CancelledByShipper => "#f44336",
            OrderStatus::FailedDelivery => "#ff5722",
            OrderStatus::Unknown(_) => "#666",
        }
    }

    /// An order still moving along the canonical path.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::CancelledByUser
                | OrderStatus::CancelledBySeller
                | OrderStatus::CancelledByShipper
                | OrderStatus::FailedDelivery
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            OrderStatus::CancelledByUser
                | OrderStatus::CancelledBySeller
                | OrderStatus::CancelledByShipper
        )
    }

    /// All named statuses, in canonical order. Excludes `Unknown`.
    pub fn known() -> [OrderStatus; 13] {
        [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Assigned,
            OrderStatus::PickedUp,
            OrderStatus::Delivering,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::CancelledByUser,
            OrderStatus::CancelledBySeller,
            OrderStatus::CancelledByShipper,
            OrderStatus::FailedDelivery,
        ]
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "preparing" => OrderStatus::Preparing,
            "ready" => OrderStatus::Ready,
            "assigned" => OrderStatus::Assigned,
            "picked_up" => OrderStatus::PickedUp,
            "delivering" => OrderStatus::Delivering,
            "delivered" => OrderStatus::Delivered,
            "completed" => OrderStatus::Completed,
            "cancelled_by_user" => OrderStatus::CancelledByUser,
            "cancelled_by_seller" => OrderStatus::CancelledBySeller,
            "cancelled_by_shipper" => OrderStatus::CancelledByShipper,
            "failed_delivery" => OrderStatus::FailedDelivery,
            other => OrderStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        OrderStatus::from(raw.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is acting on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Seller,
    Shipper,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seller => "seller",
            Role::Shipper => "shipper",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, role-scoped operation that moves an order between statuses.
///
/// Wire names match the backend's update-status actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Confirm,
    StartPreparing,
    MarkReady,
    Accept,
    PickUp,
    StartDelivering,
    Deliver,
    Complete,
    CancelByUser,
    CancelBySeller,
    CancelByShipper,
    FailDelivery,
}

/// Every action the machine knows, in canonical order.
pub const ALL_ACTIONS: [OrderAction; 12] = [
    OrderAction::Confirm,
    OrderAction::StartPreparing,
    OrderAction::MarkReady,
    OrderAction::Accept,
    OrderAction::PickUp,
    OrderAction::StartDelivering,
    OrderAction::Deliver,
    OrderAction::Complete,
    OrderAction::CancelByUser,
    OrderAction::CancelBySeller,
    OrderAction::CancelByShipper,
    OrderAction::FailDelivery,
];

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "confirm",
            OrderAction::StartPreparing => "start_preparing",
            OrderAction::MarkReady => "mark_ready",
            OrderAction::Accept => "accept",
            OrderAction::PickUp => "pick_up",
            OrderAction::StartDelivering => "start_delivering",
            OrderAction::Deliver => "deliver",
            OrderAction::Complete => "complete",
            OrderAction::CancelByUser => "cancel_by_user",
            OrderAction::CancelBySeller => "cancel_by_seller",
            OrderAction::CancelByShipper => "cancel_by_shipper",
            OrderAction::FailDelivery => "fail_delivery",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        ALL_ACTIONS.into_iter().find(|a| a.as_str() == raw)
    }

    /// The role allowed to perform this action.
    pub fn role(&self) -> Role {
        match self {
            OrderAction::Confirm
            | OrderAction::StartPreparing
            | OrderAction::MarkReady
            | OrderAction::CancelBySeller => Role::Seller,
            OrderAction::Accept
            | OrderAction::PickUp
            | OrderAction::StartDelivering
            | OrderAction::Deliver
            | OrderAction::CancelByShipper
            | OrderAction::FailDelivery => Role::Shipper,
            OrderAction::Complete | OrderAction::CancelByUser => Role::Customer,
        }
    }

    /// The status this action moves the order into.
    pub fn target(&self) -> OrderStatus {
        match self {
            OrderAction::Confirm => OrderStatus::Confirmed,
            OrderAction::StartPreparing => OrderStatus::Preparing,
            OrderAction::MarkReady => OrderStatus::Ready,
            OrderAction::Accept => OrderStatus::Assigned,
            OrderAction::PickUp => OrderStatus::PickedUp,
            OrderAction::StartDelivering => OrderStatus::Delivering,
            OrderAction::Deliver => OrderStatus::Delivered,
            OrderAction::Complete => OrderStatus::Completed,
            OrderAction::CancelByUser => OrderStatus::CancelledByUser,
            OrderAction::CancelBySeller => OrderStatus::CancelledBySeller,
            OrderAction::CancelByShipper => OrderStatus::CancelledByShipper,
            OrderAction::FailDelivery => OrderStatus::FailedDelivery,
        }
    }

    /// Whether this action is legal from `status`.
    ///
    /// Customers may only cancel while the order is still `pending`; once
    /// the restaurant has confirmed, cancellation belongs to the restaurant.
    pub fn may_start_from(&self, status: &OrderStatus) -> bool {
        match self {
            OrderAction::Confirm => matches!(status, OrderStatus::Pending),
            OrderAction::StartPreparing => matches!(status, OrderStatus::Confirmed),
            OrderAction::MarkReady => matches!(status, OrderStatus::Preparing),
            OrderAction::Accept => matches!(status, OrderStatus::Ready),
            OrderAction::PickUp => matches!(status, OrderStatus::Assigned),
            OrderAction::StartDelivering => matches!(status, OrderStatus::PickedUp),
            OrderAction::Deliver => matches!(status, OrderStatus::Delivering),
            OrderAction::Complete => matches!(status, OrderStatus::Delivered),
            OrderAction::CancelByUser => matches!(status, OrderStatus::Pending),
            OrderAction::CancelBySeller => matches!(
                status,
                OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing
            ),
            OrderAction::CancelByShipper => {
                matches!(status, OrderStatus::Assigned | OrderStatus::PickedUp)
            }
            OrderAction::FailDelivery => matches!(status, OrderStatus::Delivering),
        }
    }

    /// Apply this action to an order in `from`, validating legality first.
    pub fn apply(&self, from: &OrderStatus) -> Result<OrderStatus, IllegalTransition> {
        if self.may_start_from(from) {
            Ok(self.target())
        } else {
            Err(IllegalTransition {
                action: *self,
                status: from.clone(),
            })
        }
    }

    /// True for the cancellation and failure branches.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            OrderAction::CancelByUser
                | OrderAction::CancelBySeller
                | OrderAction::CancelByShipper
                | OrderAction::FailDelivery
        )
    }

    /// Button label for the action.
    pub fn label(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "Confirm order",
            OrderAction::StartPreparing => "Start preparing",
            OrderAction::MarkReady => "Ready for pickup",
            OrderAction::Accept => "Accept order",
            OrderAction::PickUp => "Pick up",
            OrderAction::StartDelivering => "Start delivering",
            OrderAction::Deliver => "Mark delivered",
            OrderAction::Complete => "Confirm received",
            OrderAction::CancelByUser => "Cancel order",
            OrderAction::CancelBySeller => "Cancel order",
            OrderAction::CancelByShipper => "Cancel delivery",
            OrderAction::FailDelivery => "Delivery failed",
        }
    }

    /// Default progress note sent along with the transition.
    pub fn progress_message(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "Restaurant confirmed the order",
            OrderAction::StartPreparing => "Restaurant is preparing the food",
            OrderAction::MarkReady => "Food is ready, waiting for a shipper",
            OrderAction::Accept => "Shipper accepted the order",
            OrderAction::PickUp => "Shipper picked up the order",
            OrderAction::StartDelivering => "Shipper is on the way",
            OrderAction::Deliver => "Order delivered to the customer",
            OrderAction::Complete => "Order completed",
            OrderAction::CancelByUser => "Cancelled by the customer",
            OrderAction::CancelBySeller => "Cancelled by the restaurant",
            OrderAction::CancelByShipper => "Cancelled by the shipper",
            OrderAction::FailDelivery => "Delivery failed",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next forward action for `role` at `status`, or `None` when the role has
/// nothing to do. Cancellations are excluded; see [`cancel_action`].
///
/// A seller gets `None` from `ready` onward. That boundary is enforced here
/// by the table itself, not by permission checks at call sites.
pub fn next_action(role: Role, status: &OrderStatus) -> Option<OrderAction> {
    ALL_ACTIONS
        .into_iter()
        .find(|a| !a.is_cancellation() && a.role() == role && a.may_start_from(status))
}

/// Cancellation available to `role` at `status`, if any.
///
/// `FailDelivery` is deliberately not returned here; it is a delivery
/// outcome, not a cancellation a UI should offer from a cancel button.
pub fn cancel_action(role: Role, status: &OrderStatus) -> Option<OrderAction> {
    let action = match role {
        Role::Customer => OrderAction::CancelByUser,
        Role::Seller => OrderAction::CancelBySeller,
        Role::Shipper => OrderAction::CancelByShipper,
    };
    action.may_start_from(status).then_some(action)
}

/// Button label for the role's next forward action, `None` when there is
/// no button to show.
pub fn action_label(role: Role, status: &OrderStatus) -> Option<&'static str> {
    next_action(role, status).map(|a| a.label())
}

/// Every action `role` may legally take at `status`, in canonical order.
pub fn available_actions(role: Role, status: &OrderStatus) -> Vec<OrderAction> {
    ALL_ACTIONS
        .into_iter()
        .filter(|a| a.role() == role && a.may_start_from(status))
        .collect()
}

/// Apply `action` to `status`, returning the new status when legal.
pub fn apply(status: &OrderStatus, action: OrderAction) -> Option<OrderStatus> {
    action.may_start_from(status).then(|| action.target())
}
