//! Notifications endpoints.

use axum::{Json, Router, extract::State, routing::post};
use ideaboard_common::AppResult;
use ideaboard_db::entities::notification::{self, NotificationType};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::CurrentActor, middleware::AppState, response::ApiResponse};

/// List notifications request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsRequest {
    /// Maximum results (default: 10, max: 100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub sender_id: String,
    pub follow_request_id: Option<String>,
    pub extra_data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            sender_id: n.sender_id,
            follow_request_id: n.follow_request_id,
            extra_data: n.extra_data,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Mark-read response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub marked: u64,
}

/// Notifications of the signed-in user, newest first.
async fn list(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<ListNotificationsRequest>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    req.validate()?;

    let notifications = state
        .notification_service
        .list(&actor, req.limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        notifications.into_iter().map(Into::into).collect(),
    ))
}

/// Mark every notification of the signed-in user as read.
async fn mark_read(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkReadResponse>> {
    let marked = state.notification_service.mark_all_read(&actor).await?;
    Ok(ApiResponse::ok(MarkReadResponse { marked }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(list))
        .route("/mark-read", post(mark_read))
}
