use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub common: core_config::Config,
    /// When set, spans are exported to this OTLP collector.
    pub otlp_endpoint: Option<String>,
}

impl NotificationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(NotificationConfig {
            common: common_config,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}
