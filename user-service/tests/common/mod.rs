use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use service_core::config::Config as CoreConfig;
use service_core::entity::EntityService;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use user_service::config::{NotificationServiceConfig, UserConfig};
use user_service::models::User;
use user_service::services::NotificationDispatcher;
use user_service::startup::Application;

pub struct TestApp {
    pub address: String,
    pub users: EntityService<User>,
}

impl TestApp {
    /// Spawn with the HTTP dispatcher pointed at `notification_base_url`.
    pub async fn spawn(notification_base_url: &str, timeout: Duration) -> Self {
        let app = Application::build(test_config(notification_base_url, timeout))
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    pub async fn spawn_with_dispatcher(dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        let config = test_config("http://127.0.0.1:9", Duration::from_millis(100));
        let app = Application::build_with_dispatcher(config, dispatcher)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let address = format!("http://127.0.0.1:{}", app.port());
        let users = app.users().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address, users }
    }

    pub async fn create_user(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/users", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

fn test_config(notification_base_url: &str, timeout: Duration) -> UserConfig {
    UserConfig {
        common: CoreConfig { port: 0 },
        notification: NotificationServiceConfig {
            base_url: notification_base_url.to_string(),
            timeout,
        },
        otlp_endpoint: None,
    }
}

/// How the stub notification service answers.
#[derive(Clone, Copy)]
pub enum StubBehavior {
    Accept,
    Fail(StatusCode),
    Hang(Duration),
    /// Answer 307 pointing back at `/notifications`.
    Redirect,
}

/// A request the stub received: JSON body and `x-request-id`, if any.
pub type ReceivedNotification = (serde_json::Value, Option<String>);

#[derive(Clone)]
struct StubState {
    behavior: StubBehavior,
    received: Arc<Mutex<Vec<ReceivedNotification>>>,
}

/// Stand-in for notification-service's `POST /notifications`.
pub struct StubNotificationService {
    pub base_url: String,
    received: Arc<Mutex<Vec<ReceivedNotification>>>,
}

impl StubNotificationService {
    pub async fn spawn(behavior: StubBehavior) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            behavior,
            received: received.clone(),
        };

        let router = Router::new()
            .route("/notifications", post(stub_create_notification))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let base_url = format!(
            "http://127.0.0.1:{}",
            listener.local_addr().expect("stub address").port()
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self { base_url, received }
    }

    pub fn received(&self) -> Vec<ReceivedNotification> {
        self.received.lock().unwrap().clone()
    }
}

async fn stub_create_notification(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    state
        .received
        .lock()
        .unwrap()
        .push((body.clone(), request_id));

    match state.behavior {
        StubBehavior::Accept => (StatusCode::OK, Json(body)).into_response(),
        StubBehavior::Fail(status) => {
            (status, Json(serde_json::json!({"error": "boom"}))).into_response()
        }
        StubBehavior::Hang(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, Json(body)).into_response()
        }
        StubBehavior::Redirect => (
            StatusCode::TEMPORARY_REDIRECT,
            [(header::LOCATION, "/notifications")],
        )
            .into_response(),
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let port = listener.local_addr().expect("probe address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
