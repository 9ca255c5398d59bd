//! In-memory stores for tests.
//!
//! Every operation takes the single state lock for its whole duration, so
//! multi-row writes are all-or-nothing like their database counterparts.

use super::{
    FollowEdge, IdeaQuery, IdeaStore, NotificationStore, ProfileStore, RequestStore,
    TokenGenerator, UserStore, VoteCounts,
};
use async_trait::async_trait;
use ideaboard_common::{AppError, AppResult, id::slug_with_suffix};
use ideaboard_db::entities::{
    follow_request, idea, idea::Visibility, idea_vote::VoteKind, notification, profile, user,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    users: Vec<user::Model>,
    profiles: Vec<profile::Model>,
    edges: Vec<FollowEdge>,
    requests: Vec<follow_request::Model>,
    ideas: Vec<idea::Model>,
    votes: HashMap<(String, String), VoteKind>,
    notifications: Vec<notification::Model>,
}

impl State {
    fn insert_edges(&mut self, edges: &[FollowEdge]) {
        for edge in edges {
            if !self.edges.contains(edge) {
                self.edges.push(edge.clone());
            }
        }
    }

    fn profiles_by_ids(&self, ids: impl Iterator<Item = String>) -> Vec<profile::Model> {
        ids.filter_map(|id| self.profiles.iter().find(|p| p.id == id).cloned())
            .collect()
    }
}

/// Every store contract over process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of follower edges currently stored.
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }

    /// Number of follow requests currently stored.
    pub async fn request_count(&self) -> usize {
        self.state.read().await.requests.len()
    }
}

/// Newest first: later inserts sort ahead of earlier ones.
fn newest_first<T>(items: impl DoubleEndedIterator<Item = T>) -> Vec<T> {
    items.rev().collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<user::Model>> {
        let state = self.state.read().await;
        Ok(newest_first(state.users.iter().cloned()))
    }

    async fn create_with_profile(
        &self,
        user: user::Model,
        profile: profile::Model,
    ) -> AppResult<(user::Model, profile::Model)> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict(
                "Username or email is already taken".to_string(),
            ));
        }
        state.users.push(user.clone());
        state.profiles.push(profile.clone());
        Ok((user, profile))
    }

    async fn update(&self, user: user::Model) -> AppResult<user::Model> {
        let mut state = self.state.write().await;
        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::UserNotFound(user.id.clone()))?;
        *slot = user.clone();
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile_of(&self, user_id: &str) -> AppResult<Option<profile::Model>> {
        let state = self.state.read().await;
        Ok(state.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<profile::Model>> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<profile::Model>> {
        let state = self.state.read().await;
        Ok(state.profiles.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, verified_only: bool) -> AppResult<Vec<profile::Model>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .profiles
                .iter()
                .filter(|p| !verified_only || p.verified)
                .cloned(),
        ))
    }

    async fn update(&self, profile: profile::Model) -> AppResult<profile::Model> {
        let mut state = self.state.write().await;
        let slot = state
            .profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {}", profile.id)))?;
        *slot = profile.clone();
        Ok(profile)
    }

    async fn add_follower_edges(&self, edges: &[FollowEdge]) -> AppResult<()> {
        self.state.write().await.insert_edges(edges);
        Ok(())
    }

    async fn remove_follower_edges(&self, edges: &[FollowEdge]) -> AppResult<()> {
        let remove: HashSet<&FollowEdge> = edges.iter().collect();
        self.state
            .write()
            .await
            .edges
            .retain(|edge| !remove.contains(edge));
        Ok(())
    }

    async fn is_following(&self, follower_id: &str, profile_id: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .edges
            .iter()
            .any(|e| e.follower_id == follower_id && e.profile_id == profile_id))
    }

    async fn followers(&self, profile_id: &str) -> AppResult<Vec<profile::Model>> {
        let state = self.state.read().await;
        let ids = state
            .edges
            .iter()
            .rev()
            .filter(|e| e.profile_id == profile_id)
            .map(|e| e.follower_id.clone());
        Ok(state.profiles_by_ids(ids))
    }

    async fn following(&self, profile_id: &str) -> AppResult<Vec<profile::Model>> {
        let state = self.state.read().await;
        let ids = state
            .edges
            .iter()
            .rev()
            .filter(|e| e.follower_id == profile_id)
            .map(|e| e.profile_id.clone());
        Ok(state.profiles_by_ids(ids))
    }

    async fn count_followers(&self, profile_id: &str) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .edges
            .iter()
            .filter(|e| e.profile_id == profile_id)
            .count() as u64)
    }

    async fn count_following(&self, profile_id: &str) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .edges
            .iter()
            .filter(|e| e.follower_id == profile_id)
            .count() as u64)
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn create(&self, request: follow_request::Model) -> AppResult<follow_request::Model> {
        let mut state = self.state.write().await;
        if state.requests.iter().any(|r| {
            (r.requester_id == request.requester_id && r.target_id == request.target_id)
                || r.request_id == request.request_id
        }) {
            return Err(AppError::DuplicateRequest);
        }
        state.requests.push(request.clone());
        Ok(request)
    }

    async fn find_by_key(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .iter()
            .find(|r| r.requester_id == requester_id && r.target_id == target_id)
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<follow_request::Model>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .iter()
            .find(|r| r.request_id == token)
            .cloned())
    }

    async fn save(&self, request: follow_request::Model) -> AppResult<follow_request::Model> {
        self.save_with_edges(request, &[]).await
    }

    async fn save_with_edges(
        &self,
        request: follow_request::Model,
        edges: &[FollowEdge],
    ) -> AppResult<follow_request::Model> {
        let mut state = self.state.write().await;
        let slot = state
            .requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| AppError::FollowRequestNotFound(request.request_id.clone()))?;
        *slot = request.clone();
        state.insert_edges(edges);
        Ok(request)
    }

    async fn received(&self, target_id: &str) -> AppResult<Vec<follow_request::Model>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .iter()
            .rev()
            .filter(|r| r.target_id == target_id)
            .cloned()
            .collect())
    }

    async fn sent(&self, requester_id: &str) -> AppResult<Vec<follow_request::Model>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .iter()
            .rev()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdeaStore for MemoryStore {
    async fn create(&self, idea: idea::Model) -> AppResult<idea::Model> {
        let mut state = self.state.write().await;
        if state
            .ideas
            .iter()
            .any(|i| i.slug == idea.slug || i.idea_id == idea.idea_id)
        {
            return Err(AppError::Conflict("Idea slug is already taken".to_string()));
        }
        state.ideas.push(idea.clone());
        Ok(idea)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<idea::Model>> {
        let state = self.state.read().await;
        Ok(state.ideas.iter().find(|i| i.idea_id == token).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<idea::Model>> {
        let state = self.state.read().await;
        Ok(state.ideas.iter().find(|i| i.slug == slug).cloned())
    }

    async fn update(&self, idea: idea::Model) -> AppResult<idea::Model> {
        let mut state = self.state.write().await;
        let slot = state
            .ideas
            .iter_mut()
            .find(|i| i.id == idea.id)
            .ok_or_else(|| AppError::IdeaNotFound(idea.idea_id.clone()))?;
        *slot = idea.clone();
        Ok(idea)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.ideas.retain(|i| i.id != id);
        state.votes.retain(|(idea_id, _), _| idea_id != id);
        Ok(())
    }

    async fn list(&self, query: &IdeaQuery) -> AppResult<Vec<idea::Model>> {
        let state = self.state.read().await;
        Ok(state
            .ideas
            .iter()
            .rev()
            .filter(|i| {
                query
                    .author_id
                    .as_deref()
                    .is_none_or(|author| i.author_id == author)
            })
            .filter(|i| !query.public_only || (i.active && i.visibility == Visibility::Public))
            .cloned()
            .collect())
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(idea) = state.ideas.iter_mut().find(|i| i.id == id) {
            idea.views += 1;
        }
        Ok(())
    }

    async fn vote_of(&self, idea_id: &str, user_id: &str) -> AppResult<Option<VoteKind>> {
        let state = self.state.read().await;
        Ok(state
            .votes
            .get(&(idea_id.to_string(), user_id.to_string()))
            .copied())
    }

    async fn set_vote(
        &self,
        idea_id: &str,
        user_id: &str,
        kind: Option<VoteKind>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let key = (idea_id.to_string(), user_id.to_string());
        match kind {
            Some(kind) => {
                state.votes.insert(key, kind);
            }
            None => {
                state.votes.remove(&key);
            }
        }
        Ok(())
    }

    async fn count_votes(&self, idea_id: &str) -> AppResult<VoteCounts> {
        let state = self.state.read().await;
        let mut counts = VoteCounts::default();
        for ((voted_idea, _), kind) in &state.votes {
            if voted_idea != idea_id {
                continue;
            }
            match kind {
                VoteKind::Like => counts.likes += 1,
                VoteKind::Dislike => counts.dislikes += 1,
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, notification: notification::Model) -> AppResult<notification::Model> {
        self.state
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    async fn list_for(
        &self,
        recipient_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .filter(|n| until_id.is_none_or(|until| n.id.as_str() < until))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_all_read(&self, recipient_id: &str) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut marked = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            n.is_read = true;
            marked += 1;
        }
        Ok(marked)
    }
}

/// Deterministic token source.
///
/// Produces `000001`, `000002`, ... so tests can predict identifiers. IDs
/// sort in creation order like ULIDs do.
#[derive(Debug, Default)]
pub struct SequentialTokens {
    next: AtomicU64,
}

impl SequentialTokens {
    /// Create a generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl TokenGenerator for SequentialTokens {
    fn new_id(&self) -> String {
        format!("{:026}", self.bump())
    }

    fn new_short_token(&self) -> String {
        format!("{:06}", self.bump())
    }

    fn new_session_token(&self) -> String {
        format!("session{:025}", self.bump())
    }

    fn new_slug(&self, base: &str) -> String {
        slug_with_suffix(base, &format!("{:04}", self.bump()))
    }
}
