//! user-service: user CRUD that announces new users to notification-service.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
