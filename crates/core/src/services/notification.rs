//! Notification service.

use crate::actor::Actor;
use crate::stores::{SharedNotificationStore, SharedTokenGenerator};
use chrono::Utc;
use ideaboard_common::AppResult;
use ideaboard_db::entities::{
    follow_request,
    notification::{self, NotificationType},
};
use serde_json::{Value, json};

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notifications: SharedNotificationStore,
    tokens: SharedTokenGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(notifications: SharedNotificationStore, tokens: SharedTokenGenerator) -> Self {
        Self {
            notifications,
            tokens,
        }
    }

    /// Tell the target of a follow request that someone wants to follow them.
    pub async fn notify_follow_request(
        &self,
        request: &follow_request::Model,
    ) -> AppResult<notification::Model> {
        self.create(
            &request.target_id,
            &request.requester_id,
            NotificationType::NewFollow,
            Some(&request.id),
            json!({ "status": "pending" }),
        )
        .await
    }

    /// Tell the requester that their follow request was accepted.
    pub async fn notify_request_accepted(
        &self,
        request: &follow_request::Model,
    ) -> AppResult<notification::Model> {
        self.create(
            &request.requester_id,
            &request.target_id,
            NotificationType::FollowRequestAccepted,
            Some(&request.id),
            json!({ "status": "accepted" }),
        )
        .await
    }

    /// Notifications of the actor, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        let user = actor.require()?;
        self.notifications.list_for(&user.id, limit, until_id).await
    }

    /// Mark every notification of the actor as read.
    pub async fn mark_all_read(&self, actor: &Actor) -> AppResult<u64> {
        let user = actor.require()?;
        let marked = self.notifications.mark_all_read(&user.id).await?;
        tracing::debug!(user_id = %user.id, marked, "Marked notifications as read");
        Ok(marked)
    }

    async fn create(
        &self,
        recipient_id: &str,
        sender_id: &str,
        notification_type: NotificationType,
        follow_request_id: Option<&str>,
        extra_data: Value,
    ) -> AppResult<notification::Model> {
        let model = notification::Model {
            id: self.tokens.new_id(),
            recipient_id: recipient_id.to_string(),
            sender_id: sender_id.to_string(),
            notification_type,
            follow_request_id: follow_request_id.map(ToString::to_string),
            extra_data: Some(extra_data),
            is_read: false,
            created_at: Utc::now().into(),
        };

        let notification = self.notifications.create(model).await?;
        tracing::debug!(
            recipient_id = %recipient_id,
            notification_type = ?notification_type,
            "Created notification"
        );
        Ok(notification)
    }
}
