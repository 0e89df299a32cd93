use service_core::observability::{init_metrics, init_tracing};
use service_core::utils::shutdown_signal;
use user_service::config::UserConfig;
use user_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = UserConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing("user-service", "info", config.otlp_endpoint.as_deref());
    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tokio::select! {
        result = app.run_until_stopped() => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
                return Err(e);
            }
        }
        _ = shutdown_signal() => {}
    }

    Ok(())
}
