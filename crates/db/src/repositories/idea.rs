//! Idea repository.

use std::sync::Arc;

use crate::entities::{Idea, idea, idea::Visibility};
use ideaboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

/// Filter for listing ideas.
#[derive(Debug, Clone, Default)]
pub struct IdeaQuery {
    /// Only ideas written by this user.
    pub author_id: Option<String>,
    /// Only active ideas with public visibility.
    pub public_only: bool,
}

/// Idea repository for database operations.
#[derive(Clone)]
pub struct IdeaRepository {
    db: Arc<DatabaseConnection>,
}

impl IdeaRepository {
    /// Create a new idea repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an idea by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<idea::Model>> {
        Idea::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an idea by its short external identifier.
    pub async fn find_by_idea_id(&self, idea_id: &str) -> AppResult<Option<idea::Model>> {
        Idea::find()
            .filter(idea::Column::IdeaId.eq(idea_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an idea by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<idea::Model>> {
        Idea::find()
            .filter(idea::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List ideas, newest first.
    pub async fn find_all(&self, query: &IdeaQuery) -> AppResult<Vec<idea::Model>> {
        let mut select = Idea::find().order_by_desc(idea::Column::CreatedAt);

        if let Some(author_id) = &query.author_id {
            select = select.filter(idea::Column::AuthorId.eq(author_id.as_str()));
        }

        if query.public_only {
            select = select
                .filter(idea::Column::Active.eq(true))
                .filter(idea::Column::Visibility.eq(Visibility::Public));
        }

        select
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new idea.
    pub async fn create(&self, model: idea::ActiveModel) -> AppResult<idea::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an idea.
    pub async fn update(&self, model: idea::ActiveModel) -> AppResult<idea::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an idea. Votes are removed by the cascading foreign key.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let idea = self.find_by_id(id).await?;
        if let Some(i) = idea {
            i.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Increment the view counter atomically (single UPDATE query, no fetch).
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Idea::update_many()
            .col_expr(idea::Column::Views, Expr::col(idea::Column::Views).add(1))
            .filter(idea::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_idea(id: &str, author_id: &str, visibility: Visibility) -> idea::Model {
        idea::Model {
            id: id.to_string(),
            idea_id: format!("i{id}"),
            title: "An idea".to_string(),
            body: "Body".to_string(),
            author_id: author_id.to_string(),
            visibility,
            active: true,
            slug: format!("an-idea-{id}"),
            views: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let idea = create_test_idea("1", "alice", Visibility::Public);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[idea.clone()]])
                .into_connection(),
        );

        let repo = IdeaRepository::new(db);
        let result = repo.find_by_slug("an-idea-1").await.unwrap();

        assert_eq!(result.unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_find_all_by_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_idea("2", "alice", Visibility::Private),
                    create_test_idea("1", "alice", Visibility::Public),
                ]])
                .into_connection(),
        );

        let repo = IdeaRepository::new(db);
        let query = IdeaQuery {
            author_id: Some("alice".to_string()),
            public_only: false,
        };
        let result = repo.find_all(&query).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = IdeaRepository::new(db);
        repo.increment_views("1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_idea_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<idea::Model>::new()])
                .into_connection(),
        );

        let repo = IdeaRepository::new(db);
        repo.delete("missing").await.unwrap();
    }
}
