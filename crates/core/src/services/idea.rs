//! Idea service: posting ideas and voting on them.

use crate::actor::Actor;
use crate::stores::{IdeaQuery, SharedIdeaStore, SharedTokenGenerator, VoteCounts};
use chrono::Utc;
use ideaboard_common::{AppError, AppResult};
use ideaboard_db::entities::{
    idea::{self, Visibility},
    idea_vote::VoteKind,
    user,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating an idea.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdeaInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(min = 1))]
    pub body: String,

    #[serde(default)]
    pub visibility: Visibility,
}

/// Input for updating an idea. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdeaInput {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub body: Option<String>,

    pub visibility: Option<Visibility>,

    pub active: Option<bool>,
}

/// An idea with its vote totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaDetails {
    pub idea: idea::Model,
    pub likes_count: u64,
    pub dislikes_count: u64,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    /// Whether the actor likes the idea after the toggle.
    pub liked: bool,
    pub likes_count: u64,
    pub dislikes_count: u64,
}

/// Result of toggling a dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DislikeToggle {
    /// Whether the actor dislikes the idea after the toggle.
    pub disliked: bool,
    pub likes_count: u64,
    pub dislikes_count: u64,
}

/// Idea service for business logic.
#[derive(Clone)]
pub struct IdeaService {
    ideas: SharedIdeaStore,
    tokens: SharedTokenGenerator,
}

impl IdeaService {
    /// Create a new idea service.
    #[must_use]
    pub fn new(ideas: SharedIdeaStore, tokens: SharedTokenGenerator) -> Self {
        Self { ideas, tokens }
    }

    /// Post a new idea as the actor.
    pub async fn create(&self, actor: &Actor, input: CreateIdeaInput) -> AppResult<idea::Model> {
        let author = actor.require()?;
        input.validate()?;

        let now = Utc::now();
        let idea = idea::Model {
            id: self.tokens.new_id(),
            idea_id: self.tokens.new_short_token(),
            slug: self.tokens.new_slug(&input.title),
            title: input.title,
            body: input.body,
            author_id: author.id.clone(),
            visibility: input.visibility,
            active: true,
            views: 0,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let idea = self.ideas.create(idea).await?;
        tracing::info!(idea_id = %idea.idea_id, author_id = %author.id, "Created idea");
        Ok(idea)
    }

    /// Edit an idea. Only its author may do this.
    pub async fn update(
        &self,
        actor: &Actor,
        idea_id: &str,
        input: UpdateIdeaInput,
    ) -> AppResult<idea::Model> {
        let user = actor.require()?;
        input.validate()?;
        let mut idea = self.authored_idea(user, idea_id).await?;

        if let Some(title) = input.title {
            idea.title = title;
        }
        if let Some(body) = input.body {
            idea.body = body;
        }
        if let Some(visibility) = input.visibility {
            idea.visibility = visibility;
        }
        if let Some(active) = input.active {
            idea.active = active;
        }
        idea.updated_at = Utc::now().into();

        let idea = self.ideas.update(idea).await?;
        tracing::debug!(idea_id = %idea.idea_id, "Updated idea");
        Ok(idea)
    }

    /// Delete an idea. Only its author may do this.
    pub async fn delete(&self, actor: &Actor, idea_id: &str) -> AppResult<()> {
        let user = actor.require()?;
        let idea = self.authored_idea(user, idea_id).await?;

        self.ideas.delete(&idea.id).await?;
        tracing::info!(idea_id = %idea.idea_id, "Deleted idea");
        Ok(())
    }

    /// Show an idea by slug, counting the view.
    pub async fn show(&self, slug: &str) -> AppResult<IdeaDetails> {
        let mut idea = self
            .ideas
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::IdeaNotFound(slug.to_string()))?;

        self.ideas.increment_views(&idea.id).await?;
        idea.views += 1;

        let VoteCounts { likes, dislikes } = self.ideas.count_votes(&idea.id).await?;
        Ok(IdeaDetails {
            idea,
            likes_count: likes,
            dislikes_count: dislikes,
        })
    }

    /// Every idea, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<idea::Model>> {
        self.ideas.list(&IdeaQuery::default()).await
    }

    /// Active public ideas, newest first.
    pub async fn list_public(&self) -> AppResult<Vec<idea::Model>> {
        self.ideas
            .list(&IdeaQuery {
                author_id: None,
                public_only: true,
            })
            .await
    }

    /// Ideas written by the actor. Empty for an anonymous actor.
    pub async fn list_mine(&self, actor: &Actor) -> AppResult<Vec<idea::Model>> {
        match actor.user() {
            Some(user) => {
                self.ideas
                    .list(&IdeaQuery {
                        author_id: Some(user.id.clone()),
                        public_only: false,
                    })
                    .await
            }
            None => Ok(vec![]),
        }
    }

    /// Like the idea, or take the like back if already given.
    ///
    /// Liking replaces a dislike by the same user.
    pub async fn toggle_like(&self, actor: &Actor, idea_id: &str) -> AppResult<LikeToggle> {
        let (liked, counts) = self.toggle_vote(actor, idea_id, VoteKind::Like).await?;
        Ok(LikeToggle {
            liked,
            likes_count: counts.likes,
            dislikes_count: counts.dislikes,
        })
    }

    /// Dislike the idea, or take the dislike back if already given.
    ///
    /// Disliking replaces a like by the same user.
    pub async fn toggle_dislike(&self, actor: &Actor, idea_id: &str) -> AppResult<DislikeToggle> {
        let (disliked, counts) = self.toggle_vote(actor, idea_id, VoteKind::Dislike).await?;
        Ok(DislikeToggle {
            disliked,
            likes_count: counts.likes,
            dislikes_count: counts.dislikes,
        })
    }

    async fn toggle_vote(
        &self,
        actor: &Actor,
        idea_id: &str,
        kind: VoteKind,
    ) -> AppResult<(bool, VoteCounts)> {
        let user = actor.require()?;
        let idea = self.find(idea_id).await?;

        let current = self.ideas.vote_of(&idea.id, &user.id).await?;
        let next = if current == Some(kind) {
            None
        } else {
            Some(kind)
        };
        self.ideas.set_vote(&idea.id, &user.id, next).await?;

        tracing::debug!(
            idea_id = %idea.idea_id,
            user_id = %user.id,
            vote = ?next,
            "Toggled vote"
        );

        let counts = self.ideas.count_votes(&idea.id).await?;
        Ok((next.is_some(), counts))
    }

    async fn find(&self, idea_id: &str) -> AppResult<idea::Model> {
        self.ideas
            .find_by_token(idea_id)
            .await?
            .ok_or_else(|| AppError::IdeaNotFound(idea_id.to_string()))
    }

    async fn authored_idea(&self, user: &user::Model, idea_id: &str) -> AppResult<idea::Model> {
        let idea = self.find(idea_id).await?;
        if idea.author_id != user.id {
            return Err(AppError::Forbidden(
                "Only the author can change this idea".to_string(),
            ));
        }
        Ok(idea)
    }
}
