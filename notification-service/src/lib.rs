//! notification-service: stores notifications created by other services.

pub mod config;
pub mod handlers;
pub mod models;
pub mod startup;
