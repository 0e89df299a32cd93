//! HTTP handlers for notification-service.
//!
//! Collection endpoints use the generic entity handlers from service-core.

pub mod health;
pub mod metrics;

pub use health::{health_check, root};
