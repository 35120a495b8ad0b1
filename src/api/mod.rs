//! Backend endpoint surface, grouped by resource.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod http;
pub mod notifications;
pub mod orders;
pub mod payments;

pub use http::HttpClient;
