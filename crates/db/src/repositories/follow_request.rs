//! Follow request repository.

use std::sync::Arc;

use super::{map_unique_violation, profile_follower::insert_edges};
use crate::entities::{FollowRequest, follow_request, profile_follower};
use ideaboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Follow request repository for database operations.
#[derive(Clone)]
pub struct FollowRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRequestRepository {
    /// Create a new follow request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a follow request by its short external identifier.
    pub async fn find_by_request_id(
        &self,
        request_id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::RequestId.eq(request_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a follow request by requester and target, in any status.
    pub async fn find_by_pair(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::RequesterId.eq(requester_id))
            .filter(follow_request::Column::TargetId.eq(target_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new follow request.
    ///
    /// A second request for the same pair fails with [`AppError::DuplicateRequest`].
    pub async fn create(
        &self,
        model: follow_request::ActiveModel,
    ) -> AppResult<follow_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_unique_violation(e, AppError::DuplicateRequest))
    }

    /// Update a follow request.
    pub async fn update(
        &self,
        model: follow_request::ActiveModel,
    ) -> AppResult<follow_request::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a follow request and insert follower edges in one transaction.
    pub async fn update_with_edges(
        &self,
        model: follow_request::ActiveModel,
        edges: Vec<profile_follower::ActiveModel>,
    ) -> AppResult<follow_request::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let request = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        insert_edges(&txn, edges).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(request)
    }

    /// Get requests received by a user, newest first.
    pub async fn find_received(&self, target_id: &str) -> AppResult<Vec<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::TargetId.eq(target_id))
            .order_by_desc(follow_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get requests sent by a user, newest first.
    pub async fn find_sent(&self, requester_id: &str) -> AppResult<Vec<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::RequesterId.eq(requester_id))
            .order_by_desc(follow_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
