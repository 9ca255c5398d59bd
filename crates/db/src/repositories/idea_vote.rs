//! Idea vote repository (likes and dislikes).

use std::sync::Arc;

use crate::entities::{IdeaVote, idea_vote, idea_vote::VoteKind};
use ideaboard_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    sea_query::OnConflict,
};

/// Idea vote repository for database operations.
#[derive(Clone)]
pub struct IdeaVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl IdeaVoteRepository {
    /// Create a new idea vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's vote on an idea.
    pub async fn find_by_pair(
        &self,
        idea_id: &str,
        user_id: &str,
    ) -> AppResult<Option<idea_vote::Model>> {
        IdeaVote::find()
            .filter(idea_vote::Column::IdeaId.eq(idea_id))
            .filter(idea_vote::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a vote, or change the kind of the user's existing vote.
    pub async fn upsert(&self, model: idea_vote::ActiveModel) -> AppResult<()> {
        IdeaVote::insert(model)
            .on_conflict(
                OnConflict::columns([idea_vote::Column::IdeaId, idea_vote::Column::UserId])
                    .update_column(idea_vote::Column::Kind)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a user's vote on an idea.
    pub async fn delete_by_pair(&self, idea_id: &str, user_id: &str) -> AppResult<()> {
        IdeaVote::delete_many()
            .filter(idea_vote::Column::IdeaId.eq(idea_id))
            .filter(idea_vote::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count votes of one kind on an idea.
    pub async fn count(&self, idea_id: &str, kind: VoteKind) -> AppResult<u64> {
        IdeaVote::find()
            .filter(idea_vote::Column::IdeaId.eq(idea_id))
            .filter(idea_vote::Column::Kind.eq(kind))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    #[tokio::test]
    async fn test_find_by_pair() {
        let vote = idea_vote::Model {
            id: "v1".to_string(),
            idea_id: "idea1".to_string(),
            user_id: "alice".to_string(),
            kind: VoteKind::Dislike,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote]])
                .into_connection(),
        );

        let repo = IdeaVoteRepository::new(db);
        let result = repo.find_by_pair("idea1", "alice").await.unwrap();

        assert_eq!(result.unwrap().kind, VoteKind::Dislike);
    }

    #[tokio::test]
    async fn test_upsert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = IdeaVoteRepository::new(db);
        let vote = idea_vote::ActiveModel {
            id: Set("v1".to_string()),
            idea_id: Set("idea1".to_string()),
            user_id: Set("alice".to_string()),
            kind: Set(VoteKind::Like),
            created_at: Set(Utc::now().into()),
        };

        repo.upsert(vote).await.unwrap();
    }
}
