//! Store implementations backed by the sea-orm repositories.

use super::{
    FollowEdge, IdeaQuery, IdeaStore, NotificationStore, ProfileStore, RequestStore, UserStore,
    VoteCounts,
};
use async_trait::async_trait;
use chrono::Utc;
use ideaboard_common::{AppResult, IdGenerator};
use ideaboard_db::{
    entities::{
        follow_request, idea, idea_vote, idea_vote::VoteKind, notification, profile,
        profile_follower, user,
    },
    repositories::{
        FollowRequestRepository, IdeaRepository, IdeaVoteRepository, NotificationRepository,
        ProfileFollowerRepository, ProfileRepository, UserRepository,
    },
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use std::collections::HashMap;
use std::sync::Arc;

/// All stores over one database connection.
#[derive(Clone)]
pub struct SqlStore {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    follower_repo: ProfileFollowerRepository,
    request_repo: FollowRequestRepository,
    idea_repo: IdeaRepository,
    vote_repo: IdeaVoteRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl SqlStore {
    /// Create the stores over a shared connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: UserRepository::new(db.clone()),
            profile_repo: ProfileRepository::new(db.clone()),
            follower_repo: ProfileFollowerRepository::new(db.clone()),
            request_repo: FollowRequestRepository::new(db.clone()),
            idea_repo: IdeaRepository::new(db.clone()),
            vote_repo: IdeaVoteRepository::new(db.clone()),
            notification_repo: NotificationRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    fn edge_models(&self, edges: &[FollowEdge]) -> Vec<profile_follower::ActiveModel> {
        let now = Utc::now();
        edges
            .iter()
            .map(|edge| profile_follower::ActiveModel {
                id: Set(self.id_gen.generate()),
                profile_id: Set(edge.profile_id.clone()),
                follower_id: Set(edge.follower_id.clone()),
                created_at: Set(now.into()),
            })
            .collect()
    }

    /// Load profiles by ID, keeping the order of `ids`.
    async fn profiles_in_order(&self, ids: Vec<String>) -> AppResult<Vec<profile::Model>> {
        let mut by_id: HashMap<String, profile::Model> = self
            .profile_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

/// Turn a loaded model into an active model that writes every column.
fn full_update<A, M>(model: M) -> A
where
    M: IntoActiveModel<A>,
    A: ActiveModelTrait,
{
    model.into_active_model().reset_all()
}

#[async_trait]
impl UserStore for SqlStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_username(username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_email(email).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_token(token).await
    }

    async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    async fn create_with_profile(
        &self,
        user: user::Model,
        profile: profile::Model,
    ) -> AppResult<(user::Model, profile::Model)> {
        self.user_repo
            .create_with_profile(full_update(user), full_update(profile))
            .await
    }

    async fn update(&self, user: user::Model) -> AppResult<user::Model> {
        self.user_repo.update(full_update(user)).await
    }
}

#[async_trait]
impl ProfileStore for SqlStore {
    async fn profile_of(&self, user_id: &str) -> AppResult<Option<profile::Model>> {
        self.profile_repo.find_by_user_id(user_id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<profile::Model>> {
        self.profile_repo.find_by_username(username).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<profile::Model>> {
        self.profile_repo.find_by_slug(slug).await
    }

    async fn list(&self, verified_only: bool) -> AppResult<Vec<profile::Model>> {
        self.profile_repo.find_all(verified_only).await
    }

    async fn update(&self, profile: profile::Model) -> AppResult<profile::Model> {
        self.profile_repo.update(full_update(profile)).await
    }

    async fn add_follower_edges(&self, edges: &[FollowEdge]) -> AppResult<()> {
        self.follower_repo
            .insert_edges(self.edge_models(edges))
            .await
    }

    async fn remove_follower_edges(&self, edges: &[FollowEdge]) -> AppResult<()> {
        let pairs: Vec<(String, String)> = edges
            .iter()
            .map(|e| (e.profile_id.clone(), e.follower_id.clone()))
            .collect();
        self.follower_repo.delete_edges(&pairs).await?;
        Ok(())
    }

    async fn is_following(&self, follower_id: &str, profile_id: &str) -> AppResult<bool> {
        self.follower_repo
            .is_following(follower_id, profile_id)
            .await
    }

    async fn followers(&self, profile_id: &str) -> AppResult<Vec<profile::Model>> {
        let ids = self
            .follower_repo
            .find_followers(profile_id)
            .await?
            .into_iter()
            .map(|e| e.follower_id)
            .collect();
        self.profiles_in_order(ids).await
    }

    async fn following(&self, profile_id: &str) -> AppResult<Vec<profile::Model>> {
        let ids = self
            .follower_repo
            .find_following(profile_id)
            .await?
            .into_iter()
            .map(|e| e.profile_id)
            .collect();
        self.profiles_in_order(ids).await
    }

    async fn count_followers(&self, profile_id: &str) -> AppResult<u64> {
        self.follower_repo.count_followers(profile_id).await
    }

    async fn count_following(&self, profile_id: &str) -> AppResult<u64> {
        self.follower_repo.count_following(profile_id).await
    }
}

#[async_trait]
impl RequestStore for SqlStore {
    async fn create(&self, request: follow_request::Model) -> AppResult<follow_request::Model> {
        self.request_repo.create(full_update(request)).await
    }

    async fn find_by_key(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        self.request_repo.find_by_pair(requester_id, target_id).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<follow_request::Model>> {
        self.request_repo.find_by_request_id(token).await
    }

    async fn save(&self, request: follow_request::Model) -> AppResult<follow_request::Model> {
        self.request_repo.update(full_update(request)).await
    }

    async fn save_with_edges(
        &self,
        request: follow_request::Model,
        edges: &[FollowEdge],
    ) -> AppResult<follow_request::Model> {
        self.request_repo
            .update_with_edges(full_update(request), self.edge_models(edges))
            .await
    }

    async fn received(&self, target_id: &str) -> AppResult<Vec<follow_request::Model>> {
        self.request_repo.find_received(target_id).await
    }

    async fn sent(&self, requester_id: &str) -> AppResult<Vec<follow_request::Model>> {
        self.request_repo.find_sent(requester_id).await
    }
}

#[async_trait]
impl IdeaStore for SqlStore {
    async fn create(&self, idea: idea::Model) -> AppResult<idea::Model> {
        self.idea_repo.create(full_update(idea)).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<idea::Model>> {
        self.idea_repo.find_by_idea_id(token).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<idea::Model>> {
        self.idea_repo.find_by_slug(slug).await
    }

    async fn update(&self, idea: idea::Model) -> AppResult<idea::Model> {
        self.idea_repo.update(full_update(idea)).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.idea_repo.delete(id).await
    }

    async fn list(&self, query: &IdeaQuery) -> AppResult<Vec<idea::Model>> {
        self.idea_repo.find_all(query).await
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        self.idea_repo.increment_views(id).await
    }

    async fn vote_of(&self, idea_id: &str, user_id: &str) -> AppResult<Option<VoteKind>> {
        Ok(self
            .vote_repo
            .find_by_pair(idea_id, user_id)
            .await?
            .map(|v| v.kind))
    }

    async fn set_vote(
        &self,
        idea_id: &str,
        user_id: &str,
        kind: Option<VoteKind>,
    ) -> AppResult<()> {
        match kind {
            Some(kind) => {
                let model = idea_vote::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    idea_id: Set(idea_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    kind: Set(kind),
                    created_at: Set(Utc::now().into()),
                };
                self.vote_repo.upsert(model).await
            }
            None => self.vote_repo.delete_by_pair(idea_id, user_id).await,
        }
    }

    async fn count_votes(&self, idea_id: &str) -> AppResult<VoteCounts> {
        Ok(VoteCounts {
            likes: self.vote_repo.count(idea_id, VoteKind::Like).await?,
            dislikes: self.vote_repo.count(idea_id, VoteKind::Dislike).await?,
        })
    }
}

#[async_trait]
impl NotificationStore for SqlStore {
    async fn create(&self, notification: notification::Model) -> AppResult<notification::Model> {
        self.notification_repo
            .create(full_update(notification))
            .await
    }

    async fn list_for(
        &self,
        recipient_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_recipient(recipient_id, limit, until_id)
            .await
    }

    async fn mark_all_read(&self, recipient_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(recipient_id).await
    }
}
