pub mod auth_service;
pub mod cart_service;
pub mod order_service;

pub use auth_service::AuthService;
pub use cart_service::{CartService, MergeFailure, MergeReport};
pub use order_service::OrderService;
