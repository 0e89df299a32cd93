//! HTTP handlers for user-service.
//!
//! Listing and lookup use the generic entity handlers from service-core;
//! creation is handled here because it also notifies notification-service.

pub mod health;
pub mod metrics;
pub mod users;

pub use health::{health_check, root};
pub use users::create_user;
