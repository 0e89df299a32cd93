//! Application startup and lifecycle management.

use crate::config::NotificationConfig;
use crate::handlers;
use crate::models::Notification;
use axum::{extract::FromRef, routing::get, Router};
use service_core::entity::handlers::{create_record, get_record, list_records};
use service_core::entity::EntityService;
use service_core::error::AppError;
use service_core::middleware::observe;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub notifications: EntityService<Notification>,
}

impl FromRef<AppState> for EntityService<Notification> {
    fn from_ref(state: &AppState) -> Self {
        state.notifications.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/notifications",
            get(list_records::<Notification>).post(create_record::<Notification>),
        )
        .route("/notifications/:id", get(get_record::<Notification>));

    observe(router).with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Binds the listener immediately; port 0 picks a free port.
    pub async fn build(config: NotificationConfig) -> Result<Self, AppError> {
        let state = AppState {
            notifications: EntityService::new(),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Notification service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Handle on the notification store, shared with the running server.
    pub fn notifications(&self) -> &EntityService<Notification> {
        &self.state.notifications
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            notifications: EntityService::new(),
        }
    }

    #[tokio::test]
    async fn root_reports_running() {
        let response = build_router(state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn create_uses_shared_store() {
        let state = state();
        let response = build_router(state.clone())
            .oneshot(
                Request::post("/notifications")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"user_id":1,"message":"hi","email":"a@b.com","timestamp":123.0}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stored = state.notifications.list_records();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, 1);
        assert_eq!(stored[0].message, "hi");
    }
}
