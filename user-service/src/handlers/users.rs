use crate::models::{User, UserCreate};
use crate::services::{acknowledge, NotificationPayload};
use crate::startup::AppState;
use axum::{extract::State, Extension, Json};
use service_core::extract::ValidatedJson;
use service_core::middleware::RequestId;

/// Create a user, then make one best-effort attempt to notify
/// notification-service. The response depends only on the insert.
pub async fn create_user(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    ValidatedJson(input): ValidatedJson<UserCreate>,
) -> Json<User> {
    let user = state.users.create_record(input);

    let payload = NotificationPayload::welcome(&user);
    let request_id = request_id.map(|Extension(RequestId(id))| id);
    let outcome = state
        .dispatcher
        .dispatch(&payload, request_id.as_deref())
        .await;
    acknowledge(outcome, user.id);

    Json(user)
}
