pub mod notification_client;

pub use notification_client::{
    acknowledge, DispatchError, DispatchReceipt, HttpNotificationDispatcher,
    MockNotificationDispatcher, NotificationDispatcher, NotificationPayload,
};
