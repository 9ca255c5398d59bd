//! Storage contracts used by the services.
//!
//! Services depend on these traits rather than on repositories directly, so
//! the follow-graph state machine can run against the database or against
//! the in-memory store used in tests.

#![allow(missing_docs)]

mod sql;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use sql::SqlStore;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryStore, SequentialTokens};

use async_trait::async_trait;
use ideaboard_common::{AppResult, IdGenerator};
use ideaboard_db::entities::{
    follow_request, idea, idea_vote::VoteKind, notification, profile, user,
};
use std::sync::Arc;

pub use ideaboard_db::repositories::IdeaQuery;

/// A directed follower edge: `follower_id` follows `profile_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    /// The profile being followed.
    pub profile_id: String,
    /// The profile that follows.
    pub follower_id: String,
}

impl FollowEdge {
    /// Edge meaning `follower` follows `followed`.
    #[must_use]
    pub fn new(follower: &profile::Model, followed: &profile::Model) -> Self {
        Self {
            profile_id: followed.id.clone(),
            follower_id: follower.id.clone(),
        }
    }

    /// Both directions between two profiles.
    #[must_use]
    pub fn both_ways(a: &profile::Model, b: &profile::Model) -> [Self; 2] {
        [Self::new(a, b), Self::new(b, a)]
    }
}

/// Like and dislike totals of an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteCounts {
    pub likes: u64,
    pub dislikes: u64,
}

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>>;

    /// All users, newest first.
    async fn list(&self) -> AppResult<Vec<user::Model>>;

    /// Insert a user and its profile atomically.
    ///
    /// Fails with `Conflict` if the username or email is taken.
    async fn create_with_profile(
        &self,
        user: user::Model,
        profile: profile::Model,
    ) -> AppResult<(user::Model, profile::Model)>;

    async fn update(&self, user: user::Model) -> AppResult<user::Model>;
}

/// Profile persistence and the follower graph.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The profile owned by a user.
    async fn profile_of(&self, user_id: &str) -> AppResult<Option<profile::Model>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<profile::Model>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<profile::Model>>;

    /// Profiles, newest first.
    async fn list(&self, verified_only: bool) -> AppResult<Vec<profile::Model>>;

    async fn update(&self, profile: profile::Model) -> AppResult<profile::Model>;

    /// Add edges atomically. Edges already present are kept.
    async fn add_follower_edges(&self, edges: &[FollowEdge]) -> AppResult<()>;

    /// Remove edges atomically. Missing edges are ignored.
    async fn remove_follower_edges(&self, edges: &[FollowEdge]) -> AppResult<()>;

    /// Whether `follower_id` follows `profile_id`.
    async fn is_following(&self, follower_id: &str, profile_id: &str) -> AppResult<bool>;

    /// Profiles following `profile_id`.
    async fn followers(&self, profile_id: &str) -> AppResult<Vec<profile::Model>>;

    /// Profiles that `profile_id` follows.
    async fn following(&self, profile_id: &str) -> AppResult<Vec<profile::Model>>;

    async fn count_followers(&self, profile_id: &str) -> AppResult<u64>;

    async fn count_following(&self, profile_id: &str) -> AppResult<u64>;
}

/// Follow request persistence.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Insert a new request.
    ///
    /// Fails with `DuplicateRequest` if one exists for the same ordered pair.
    async fn create(&self, request: follow_request::Model) -> AppResult<follow_request::Model>;

    /// The request from `requester_id` to `target_id`, in any status.
    async fn find_by_key(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> AppResult<Option<follow_request::Model>>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<follow_request::Model>>;

    async fn save(&self, request: follow_request::Model) -> AppResult<follow_request::Model>;

    /// Save the request and add follower edges as one atomic unit.
    async fn save_with_edges(
        &self,
        request: follow_request::Model,
        edges: &[FollowEdge],
    ) -> AppResult<follow_request::Model>;

    /// Requests addressed to `target_id`, newest first.
    async fn received(&self, target_id: &str) -> AppResult<Vec<follow_request::Model>>;

    /// Requests sent by `requester_id`, newest first.
    async fn sent(&self, requester_id: &str) -> AppResult<Vec<follow_request::Model>>;
}

/// Idea and vote persistence.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn create(&self, idea: idea::Model) -> AppResult<idea::Model>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<idea::Model>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<idea::Model>>;

    async fn update(&self, idea: idea::Model) -> AppResult<idea::Model>;

    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Ideas matching `query`, newest first.
    async fn list(&self, query: &IdeaQuery) -> AppResult<Vec<idea::Model>>;

    async fn increment_views(&self, id: &str) -> AppResult<()>;

    /// The vote `user_id` cast on the idea, if any.
    async fn vote_of(&self, idea_id: &str, user_id: &str) -> AppResult<Option<VoteKind>>;

    /// Replace the user's vote on the idea. `None` removes it.
    async fn set_vote(&self, idea_id: &str, user_id: &str, kind: Option<VoteKind>)
    -> AppResult<()>;

    async fn count_votes(&self, idea_id: &str) -> AppResult<VoteCounts>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: notification::Model) -> AppResult<notification::Model>;

    /// Notifications for a user, newest first.
    async fn list_for(
        &self,
        recipient_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>>;

    /// Returns the number of notifications marked.
    async fn mark_all_read(&self, recipient_id: &str) -> AppResult<u64>;
}

/// Source of identifiers, external tokens and slugs.
pub trait TokenGenerator: Send + Sync {
    /// Primary key for a new row.
    fn new_id(&self) -> String;

    /// Short lowercase alphanumeric external identifier.
    fn new_short_token(&self) -> String;

    /// Bearer token for a session.
    fn new_session_token(&self) -> String;

    /// URL slug derived from `base`.
    fn new_slug(&self, base: &str) -> String;
}

impl TokenGenerator for IdGenerator {
    fn new_id(&self) -> String {
        self.generate()
    }

    fn new_short_token(&self) -> String {
        self.generate_short_token()
    }

    fn new_session_token(&self) -> String {
        self.generate_token()
    }

    fn new_slug(&self, base: &str) -> String {
        self.generate_slug(base)
    }
}

pub type SharedUserStore = Arc<dyn UserStore>;
pub type SharedProfileStore = Arc<dyn ProfileStore>;
pub type SharedRequestStore = Arc<dyn RequestStore>;
pub type SharedIdeaStore = Arc<dyn IdeaStore>;
pub type SharedNotificationStore = Arc<dyn NotificationStore>;
pub type SharedTokenGenerator = Arc<dyn TokenGenerator>;
