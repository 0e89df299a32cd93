//! Application startup and lifecycle management.

use crate::config::UserConfig;
use crate::handlers;
use crate::models::User;
use crate::services::{HttpNotificationDispatcher, NotificationDispatcher};
use axum::{extract::FromRef, routing::get, Router};
use service_core::entity::handlers::{get_record, list_records};
use service_core::entity::EntityService;
use service_core::error::AppError;
use service_core::middleware::observe;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: EntityService<User>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
}

impl FromRef<AppState> for EntityService<User> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/users",
            get(list_records::<User>).post(handlers::create_user),
        )
        .route("/users/:id", get(get_record::<User>));

    observe(router).with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, dispatching notifications over HTTP.
    pub async fn build(config: UserConfig) -> Result<Self, AppError> {
        let dispatcher = Arc::new(HttpNotificationDispatcher::new(&config.notification)?);
        Self::build_with_dispatcher(config, dispatcher).await
    }

    /// Build the application with a caller-supplied dispatcher.
    ///
    /// Binds the listener immediately; port 0 picks a free port.
    pub async fn build_with_dispatcher(
        config: UserConfig,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            users: EntityService::new(),
            dispatcher,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("User service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Handle on the user store, shared with the running server.
    pub fn users(&self) -> &EntityService<User> {
        &self.state.users
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
    use crate::services::MockNotificationDispatcher;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn state(dispatcher: Arc<dyn NotificationDispatcher>) -> AppState {
        AppState {
            users: EntityService::new(),
            dispatcher,
        }
    }

    fn create_request(body: &'static str, request_id: &'static str) -> Request<Body> {
        Request::post("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", request_id)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn create_user_dispatches_welcome_notification() {
        let mock = Arc::new(MockNotificationDispatcher::new());
        let state = state(mock.clone());

        let response = build_router(state.clone())
            .oneshot(create_request(
                r#"{"name":"Ada","email":"ada@example.com"}"#,
                "req-42",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-42");

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, 1);
        assert_eq!(sent[0].message, "Welcome, Ada!");
        assert_eq!(sent[0].email, "ada@example.com");
    }

    #[tokio::test]
    async fn failed_dispatch_keeps_the_user() {
        let mock = Arc::new(MockNotificationDispatcher::failing());
        let state = state(mock.clone());

        let response = build_router(state.clone())
            .oneshot(create_request(
                r#"{"name":"Grace","email":"grace@example.com"}"#,
                "req-43",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mock.sent().len(), 1);
        assert_eq!(state.users.get_record(1).unwrap().name, "Grace");
    }

    #[tokio::test]
    async fn invalid_body_skips_dispatch() {
        let mock = Arc::new(MockNotificationDispatcher::new());
        let state = state(mock.clone());

        let response = build_router(state.clone())
            .oneshot(create_request(r#"{"name":"Ada"}"#, "req-44"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(mock.sent().is_empty());
        assert!(state.users.store().is_empty());
    }
}
