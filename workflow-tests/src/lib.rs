//! Cross-service workflow integration tests library.
//!
//! Runs notification-service and user-service in-process on ephemeral ports,
//! with user-service's dispatcher pointed at the live notification-service.

use anyhow::{anyhow, Result};
use notification_service::config::NotificationConfig;
use notification_service::models::Notification;
use service_core::config::Config as CoreConfig;
use service_core::entity::EntityService;
use std::sync::Once;
use std::time::Duration;
use user_service::config::{NotificationServiceConfig, UserConfig};
use user_service::models::User;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Both services running against each other.
pub struct ServiceStack {
    pub user_address: String,
    pub notification_address: String,
    pub users: EntityService<User>,
    pub notifications: EntityService<Notification>,
    pub client: reqwest::Client,
}

impl ServiceStack {
    /// Start notification-service, then user-service pointed at it.
    pub async fn spawn(dispatch_timeout: Duration) -> Result<Self> {
        init_tracing();

        let notification_app =
            notification_service::startup::Application::build(NotificationConfig {
                common: CoreConfig { port: 0 },
                otlp_endpoint: None,
            })
            .await
            .map_err(|e| anyhow!("Failed to build notification-service: {}", e))?;
        let notification_address = format!("http://127.0.0.1:{}", notification_app.port());
        let notifications = notification_app.notifications().clone();

        let user_app = user_service::startup::Application::build(UserConfig {
            common: CoreConfig { port: 0 },
            notification: NotificationServiceConfig {
                base_url: notification_address.clone(),
                timeout: dispatch_timeout,
            },
            otlp_endpoint: None,
        })
        .await
        .map_err(|e| anyhow!("Failed to build user-service: {}", e))?;
        let user_address = format!("http://127.0.0.1:{}", user_app.port());
        let users = user_app.users().clone();

        tokio::spawn(async move {
            notification_app.run_until_stopped().await.ok();
        });
        tokio::spawn(async move {
            user_app.run_until_stopped().await.ok();
        });

        let stack = Self {
            user_address,
            notification_address,
            users,
            notifications,
            client: reqwest::Client::new(),
        };
        stack.wait_until_healthy(Duration::from_secs(5)).await?;
        Ok(stack)
    }

    /// Poll both `/health` endpoints until they answer 200.
    pub async fn wait_until_healthy(&self, timeout: Duration) -> Result<()> {
        let start = std::time::Instant::now();
        let health_urls = [
            ("user", format!("{}/health", self.user_address)),
            ("notification", format!("{}/health", self.notification_address)),
        ];

        loop {
            let mut unhealthy = Vec::new();
            for (name, url) in &health_urls {
                match self.client.get(url).send().await {
                    Ok(resp) if resp.status().is_success() => {}
                    Ok(resp) => unhealthy.push(format!("{} (status: {})", name, resp.status())),
                    Err(e) => unhealthy.push(format!("{} (error: {})", name, e)),
                }
            }

            if unhealthy.is_empty() {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(anyhow!(
                    "Timeout waiting for services. Unhealthy: {}",
                    unhealthy.join(", ")
                ));
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(format!("{}/users", self.user_address))
            .json(&serde_json::json!({"name": name, "email": email}))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn list_notifications(&self) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .get(format!("{}/notifications", self.notification_address))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
