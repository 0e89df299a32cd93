use notification_service::config::NotificationConfig;
use notification_service::models::Notification;
use notification_service::startup::Application;
use service_core::config::Config as CoreConfig;
use service_core::entity::EntityService;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub notifications: EntityService<Notification>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // Use random port for testing (port 0)
        let config = NotificationConfig {
            common: CoreConfig { port: 0 },
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let notifications = app.notifications().clone();
        let address = format!("http://127.0.0.1:{}", port);

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
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            notifications,
        }
    }

    pub async fn post_notification(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/notifications", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
