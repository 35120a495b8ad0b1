//! Rust client for a food delivery marketplace backend.
//!
//! The crate covers the full customer/seller/shipper order lifecycle
//! ([`lifecycle`]), a guest cart that survives restarts and merges into the
//! server cart on login ([`services::CartService`]), checkout with a client
//! token for correlation ([`services::OrderService`]), and polling-based
//! order tracking ([`tracking::OrderTracker`]). [`Client`] ties it all
//! together.

pub mod api;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod response;
pub mod services;
pub mod store;
pub mod tracking;

pub use client::{Client, LoginOutcome};
pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
pub use lifecycle::{IllegalTransition, OrderAction, OrderStatus, Role};
pub use models::{
    Cart, CartItem, Food, Notification, Order, OrderItem, Payment, PaymentMethod, PaymentStatus,
    Restaurant, RouteLeg, UserProfile,
};
pub use services::{AuthService, CartService, MergeFailure, MergeReport, OrderService};
pub use store::Store;
pub use tracking::OrderTracker;
