//! Profile follower repository (directed follow edges).

use std::sync::Arc;

use crate::entities::{ProfileFollower, profile_follower};
use ideaboard_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, sea_query::OnConflict,
};

/// Profile follower repository for database operations.
#[derive(Clone)]
pub struct ProfileFollowerRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileFollowerRepository {
    /// Create a new profile follower repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an edge by followed profile and follower.
    pub async fn find_by_pair(
        &self,
        profile_id: &str,
        follower_id: &str,
    ) -> AppResult<Option<profile_follower::Model>> {
        ProfileFollower::find()
            .filter(profile_follower::Column::ProfileId.eq(profile_id))
            .filter(profile_follower::Column::FollowerId.eq(follower_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if `follower_id` follows `profile_id`.
    pub async fn is_following(&self, follower_id: &str, profile_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(profile_id, follower_id).await?.is_some())
    }

    /// Insert edges, keeping any that already exist.
    ///
    /// All edges go out in a single statement.
    pub async fn insert_edges(&self, edges: Vec<profile_follower::ActiveModel>) -> AppResult<()> {
        insert_edges(self.db.as_ref(), edges).await
    }

    /// Delete the given `(profile_id, follower_id)` edges in a single statement.
    ///
    /// Returns the number of edges removed.
    pub async fn delete_edges(&self, pairs: &[(String, String)]) -> AppResult<u64> {
        if pairs.is_empty() {
            return Ok(0);
        }

        let condition = pairs
            .iter()
            .fold(Condition::any(), |cond, (profile_id, follower_id)| {
                cond.add(
                    Condition::all()
                        .add(profile_follower::Column::ProfileId.eq(profile_id.as_str()))
                        .add(profile_follower::Column::FollowerId.eq(follower_id.as_str())),
                )
            });

        let result = ProfileFollower::delete_many()
            .filter(condition)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Get the edges pointing at a profile (its followers), newest first.
    pub async fn find_followers(&self, profile_id: &str) -> AppResult<Vec<profile_follower::Model>> {
        ProfileFollower::find()
            .filter(profile_follower::Column::ProfileId.eq(profile_id))
            .order_by_desc(profile_follower::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the edges leaving a profile (who it follows), newest first.
    pub async fn find_following(
        &self,
        follower_id: &str,
    ) -> AppResult<Vec<profile_follower::Model>> {
        ProfileFollower::find()
            .filter(profile_follower::Column::FollowerId.eq(follower_id))
            .order_by_desc(profile_follower::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a profile.
    pub async fn count_followers(&self, profile_id: &str) -> AppResult<u64> {
        ProfileFollower::find()
            .filter(profile_follower::Column::ProfileId.eq(profile_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count profiles a profile follows.
    pub async fn count_following(&self, follower_id: &str) -> AppResult<u64> {
        ProfileFollower::find()
            .filter(profile_follower::Column::FollowerId.eq(follower_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Insert edges on any connection, ignoring pairs that are already present.
pub(crate) async fn insert_edges<C: ConnectionTrait>(
    conn: &C,
    edges: Vec<profile_follower::ActiveModel>,
) -> AppResult<()> {
    if edges.is_empty() {
        return Ok(());
    }

    ProfileFollower::insert_many(edges)
        .on_conflict(
            OnConflict::columns([
                profile_follower::Column::ProfileId,
                profile_follower::Column::FollowerId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_edge(profile_id: &str, follower_id: &str) -> profile_follower::Model {
        profile_follower::Model {
            id: format!("{profile_id}-{follower_id}"),
            profile_id: profile_id.to_string(),
            follower_id: follower_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_following_true() {
        let edge = create_test_edge("bob", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let repo = ProfileFollowerRepository::new(db);
        assert!(repo.is_following("alice", "bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile_follower::Model>::new()])
                .into_connection(),
        );

        let repo = ProfileFollowerRepository::new(db);
        assert!(!repo.is_following("alice", "bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_edges() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = ProfileFollowerRepository::new(db);
        let edges = vec![
            profile_follower::ActiveModel {
                id: Set("e1".to_string()),
                profile_id: Set("bob".to_string()),
                follower_id: Set("alice".to_string()),
                created_at: Set(Utc::now().into()),
            },
            profile_follower::ActiveModel {
                id: Set("e2".to_string()),
                profile_id: Set("alice".to_string()),
                follower_id: Set("bob".to_string()),
                created_at: Set(Utc::now().into()),
            },
        ];

        repo.insert_edges(edges).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_no_edges_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ProfileFollowerRepository::new(db);
        repo.insert_edges(vec![]).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_edges() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = ProfileFollowerRepository::new(db);
        let removed = repo
            .delete_edges(&[
                ("bob".to_string(), "alice".to_string()),
                ("alice".to_string(), "bob".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_find_followers() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_edge("bob", "alice"),
                    create_test_edge("bob", "carol"),
                ]])
                .into_connection(),
        );

        let repo = ProfileFollowerRepository::new(db);
        let followers = repo.find_followers("bob").await.unwrap();

        assert_eq!(followers.len(), 2);
        assert!(followers.iter().all(|e| e.profile_id == "bob"));
    }
}
