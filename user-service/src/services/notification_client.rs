//! Best-effort notification dispatch to notification-service.
//!
//! A dispatch is a single `POST /notifications` bounded by a timeout. There is
//! no retry, queue or persistence: each attempt either succeeds or fails, and
//! a failure is only ever logged. [`NotificationDispatcher::dispatch`] returns
//! a `Result` so callers have to acknowledge the outcome; [`acknowledge`] is
//! the single place that logs and then drops it.

use crate::config::NotificationServiceConfig;
use crate::models::User;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{redirect, StatusCode};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::observability::TracedClientExt;
use service_core::utils::unix_timestamp;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Body sent to `POST /notifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub user_id: u64,
    pub message: String,
    pub email: String,
    pub timestamp: f64,
}

impl NotificationPayload {
    /// Welcome message for a newly created user, stamped with the current time.
    pub fn welcome(user: &User) -> Self {
        Self {
            user_id: user.id,
            message: format!("Welcome, {}!", user.name),
            email: user.email.clone(),
            timestamp: unix_timestamp(),
        }
    }
}

/// A dispatch the downstream accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub status: StatusCode,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("notification service did not respond within {0:?}")]
    Timeout(Duration),

    #[error("could not connect to notification service: {0}")]
    Connection(String),

    #[error("notification service returned {0}")]
    Status(StatusCode),

    #[error("notification request failed: {0}")]
    Request(#[source] reqwest::Error),
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Make one delivery attempt.
    async fn dispatch(
        &self,
        payload: &NotificationPayload,
        request_id: Option<&str>,
    ) -> Result<DispatchReceipt, DispatchError>;
}

/// Log a dispatch outcome and discard it.
///
/// Failures never reach the caller's response.
pub fn acknowledge(outcome: Result<DispatchReceipt, DispatchError>, user_id: u64) {
    match outcome {
        Ok(receipt) => {
            metrics::counter!("notification_dispatch_total", "outcome" => "succeeded")
                .increment(1);
            tracing::info!(
                user_id,
                status = %receipt.status,
                "Notification dispatched"
            );
        }
        Err(e) => {
            metrics::counter!("notification_dispatch_total", "outcome" => "failed").increment(1);
            tracing::error!(user_id, error = %e, "Notification error");
        }
    }
}

/// Dispatcher that calls notification-service over HTTP.
#[derive(Clone)]
pub struct HttpNotificationDispatcher {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpNotificationDispatcher {
    /// Redirects are not followed, so a 3xx answer is a failed dispatch.
    pub fn new(config: &NotificationServiceConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to create notification HTTP client")?;
        let endpoint = format!("{}/notifications", config.base_url);

        tracing::info!(
            endpoint = %endpoint,
            timeout_ms = config.timeout.as_millis() as u64,
            "Notification dispatcher configured"
        );

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> DispatchError {
        if err.is_timeout() {
            DispatchError::Timeout(self.timeout)
        } else if err.is_connect() {
            DispatchError::Connection(err.to_string())
        } else {
            DispatchError::Request(err)
        }
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    #[instrument(skip(self, payload), fields(user_id = payload.user_id, endpoint = %self.endpoint))]
    async fn dispatch(
        &self,
        payload: &NotificationPayload,
        request_id: Option<&str>,
    ) -> Result<DispatchReceipt, DispatchError> {
        let response = self
            .client
            .traced_post(&self.endpoint)
            .json(payload)
            .timeout(self.timeout)
            .send_with_request_id(request_id)
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status));
        }

        Ok(DispatchReceipt { status })
    }
}

/// In-memory dispatcher for tests. Records every payload it is handed.
pub struct MockNotificationDispatcher {
    fail: bool,
    sent: Mutex<Vec<NotificationPayload>>,
}

impl MockNotificationDispatcher {
    /// A dispatcher whose attempts all succeed.
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A dispatcher whose attempts all fail after being recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockNotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDispatcher for MockNotificationDispatcher {
    async fn dispatch(
        &self,
        payload: &NotificationPayload,
        _request_id: Option<&str>,
    ) -> Result<DispatchReceipt, DispatchError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());

        if self.fail {
            return Err(DispatchError::Connection(
                "mock dispatcher configured to fail".to_string(),
            ));
        }

        tracing::info!(user_id = payload.user_id, "[MOCK] Notification would be sent");
        Ok(DispatchReceipt {
            status: StatusCode::OK,
        })
    }
}
