use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Used when `NOTIFICATION_TIMEOUT_MS` is unset.
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct UserConfig {
    pub common: core_config::Config,
    pub notification: NotificationServiceConfig,
    /// When set, spans are exported to this OTLP collector.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotificationServiceConfig {
    /// Base URL of notification-service, without a trailing slash.
    pub base_url: String,
    /// Upper bound on a single notification call.
    pub timeout: Duration,
}

impl UserConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(UserConfig {
            common: common_config,
            notification: NotificationServiceConfig::from_lookup(|key| env::var(key).ok())?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}

impl NotificationServiceConfig {
    /// Build from a variable lookup. The base URL has no default: a user
    /// service that cannot reach notification-service must not start.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = lookup("NOTIFICATION_SERVICE_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "NOTIFICATION_SERVICE_BASE_URL is required but not set"
                ))
            })?;

        let timeout_ms = match lookup("NOTIFICATION_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "NOTIFICATION_TIMEOUT_MS must be a whole number of milliseconds, got {:?}: {}",
                    raw,
                    e
                ))
            })?,
            None => DEFAULT_NOTIFICATION_TIMEOUT_MS,
        };

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}
