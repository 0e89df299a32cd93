use serde::{Deserialize, Serialize};
use service_core::entity::Entity;
use service_core::utils::unix_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub user_id: i64,
    pub message: String,
    pub email: String,
    /// Seconds since the Unix epoch at which the notification was stored.
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub user_id: i64,
    pub message: String,
    pub email: String,
    /// Required in the request body but replaced by the server's clock.
    pub timestamp: f64,
}

impl Entity for Notification {
    const NAME: &'static str = "Notification";
    type Create = NotificationCreate;

    fn from_create(id: u64, input: NotificationCreate) -> Self {
        Self {
            id,
            user_id: input.user_id,
            message: input.message,
            email: input.email,
            timestamp: unix_timestamp(),
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}
