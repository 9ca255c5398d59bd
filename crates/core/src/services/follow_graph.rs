//! Follow graph service.
//!
//! Owns the follow-request state machine and its effect on the follower
//! graph. A request starts `pending` and moves exactly once to `accepted`
//! or `rejected`; both are terminal. Accepting links the two profiles in
//! both directions inside one store transaction.
//!
//! Follower edges are directed: an edge means the follower appears in the
//! followed profile's follower set. Mutual following is derived from the
//! presence of both directions.

use crate::actor::Actor;
use crate::services::notification::NotificationService;
use crate::stores::{
    FollowEdge, SharedProfileStore, SharedRequestStore, SharedTokenGenerator, SharedUserStore,
};
use chrono::Utc;
use ideaboard_common::{AppError, AppResult};
use ideaboard_db::entities::{
    follow_request::{self, FollowRequestStatus},
    profile, user,
};
use serde::Serialize;

/// How the actor and another user are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRelation {
    /// The actor follows the other user.
    pub following: bool,
    /// The other user follows the actor.
    pub followed_by: bool,
    /// Both of the above.
    pub mutual: bool,
}

/// Follow graph service for business logic.
#[derive(Clone)]
pub struct FollowGraphService {
    users: SharedUserStore,
    profiles: SharedProfileStore,
    requests: SharedRequestStore,
    tokens: SharedTokenGenerator,
    notifications: Option<NotificationService>,
}

impl FollowGraphService {
    /// Create a new follow graph service.
    #[must_use]
    pub fn new(
        users: SharedUserStore,
        profiles: SharedProfileStore,
        requests: SharedRequestStore,
        tokens: SharedTokenGenerator,
    ) -> Self {
        Self {
            users,
            profiles,
            requests,
            tokens,
            notifications: None,
        }
    }

    /// Set the notification service.
    pub fn set_notifications(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    // ==================== Follow requests ====================

    /// Ask `target_username` to follow each other.
    ///
    /// At most one request exists per ordered pair, whatever its status, so
    /// a rejected requester cannot ask again.
    pub async fn send_request(
        &self,
        actor: &Actor,
        target_username: &str,
    ) -> AppResult<follow_request::Model> {
        let requester = actor.require()?;
        let target = self.user_by_username(target_username).await?;

        if requester.id == target.id {
            return Err(AppError::SelfFollow);
        }

        if self
            .requests
            .find_by_key(&requester.id, &target.id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateRequest);
        }

        let now = Utc::now();
        let request = follow_request::Model {
            id: self.tokens.new_id(),
            request_id: self.tokens.new_short_token(),
            requester_id: requester.id.clone(),
            target_id: target.id.clone(),
            status: FollowRequestStatus::Pending,
            created_at: now.into(),
            updated_at: now.into(),
        };

        // The store maps a concurrent duplicate to DuplicateRequest
        let request = self.requests.create(request).await?;

        tracing::info!(
            request_id = %request.request_id,
            requester_id = %requester.id,
            target_id = %target.id,
            "Follow request sent"
        );

        if let Some(ref notifications) = self.notifications
            && let Err(e) = notifications.notify_follow_request(&request).await
        {
            tracing::warn!(error = %e, "Failed to create follow request notification");
        }

        Ok(request)
    }

    /// Accept a pending request addressed to the actor.
    ///
    /// The request becomes `accepted` and the two profiles follow each
    /// other, atomically.
    pub async fn accept_request(
        &self,
        actor: &Actor,
        request_token: &str,
    ) -> AppResult<follow_request::Model> {
        let mut request = self.pending_request_for(actor, request_token).await?;

        let requester_profile = self.profile_of(&request.requester_id).await?;
        let target_profile = self.profile_of(&request.target_id).await?;
        let edges = FollowEdge::both_ways(&requester_profile, &target_profile);

        request.status = FollowRequestStatus::Accepted;
        request.updated_at = Utc::now().into();
        let request = self.requests.save_with_edges(request, &edges).await?;

        tracing::info!(
            request_id = %request.request_id,
            requester_id = %request.requester_id,
            target_id = %request.target_id,
            "Follow request accepted"
        );

        if let Some(ref notifications) = self.notifications
            && let Err(e) = notifications.notify_request_accepted(&request).await
        {
            tracing::warn!(error = %e, "Failed to create request accepted notification");
        }

        Ok(request)
    }

    /// Reject a pending request addressed to the actor. The graph is untouched.
    pub async fn reject_request(
        &self,
        actor: &Actor,
        request_token: &str,
    ) -> AppResult<follow_request::Model> {
        let mut request = self.pending_request_for(actor, request_token).await?;

        request.status = FollowRequestStatus::Rejected;
        request.updated_at = Utc::now().into();
        let request = self.requests.save(request).await?;

        tracing::info!(
            request_id = %request.request_id,
            requester_id = %request.requester_id,
            target_id = %request.target_id,
            "Follow request rejected"
        );

        Ok(request)
    }

    /// Requests addressed to the actor, newest first.
    pub async fn received_requests(&self, actor: &Actor) -> AppResult<Vec<follow_request::Model>> {
        match actor.user() {
            Some(user) => self.requests.received(&user.id).await,
            None => Ok(vec![]),
        }
    }

    /// Requests sent by the actor, newest first.
    pub async fn sent_requests(&self, actor: &Actor) -> AppResult<Vec<follow_request::Model>> {
        match actor.user() {
            Some(user) => self.requests.sent(&user.id).await,
            None => Ok(vec![]),
        }
    }

    // ==================== Graph edits ====================

    /// Stop following `target_username`.
    ///
    /// Removes the edge in both directions.
    pub async fn unfollow(&self, actor: &Actor, target_username: &str) -> AppResult<()> {
        let user = actor.require()?;
        let target = self.user_by_username(target_username).await?;

        let mine = self.profile_of(&user.id).await?;
        let theirs = self.profile_of(&target.id).await?;

        if !self.profiles.is_following(&mine.id, &theirs.id).await? {
            return Err(AppError::NotFollowing);
        }

        self.profiles
            .remove_follower_edges(&FollowEdge::both_ways(&mine, &theirs))
            .await?;

        tracing::info!(user_id = %user.id, target_id = %target.id, "Unfollowed");
        Ok(())
    }

    /// Remove `follower_username` from the actor's followers.
    ///
    /// Removes the edge in both directions.
    pub async fn remove_follower(&self, actor: &Actor, follower_username: &str) -> AppResult<()> {
        let user = actor.require()?;
        let follower = self.user_by_username(follower_username).await?;

        let mine = self.profile_of(&user.id).await?;
        let theirs = self.profile_of(&follower.id).await?;

        if !self.profiles.is_following(&theirs.id, &mine.id).await? {
            return Err(AppError::NotFollower);
        }

        self.profiles
            .remove_follower_edges(&FollowEdge::both_ways(&mine, &theirs))
            .await?;

        tracing::info!(user_id = %user.id, follower_id = %follower.id, "Removed follower");
        Ok(())
    }

    /// Follow `target_username` without a request.
    ///
    /// Adds the single edge actor → target.
    pub async fn follow_directly(&self, actor: &Actor, target_username: &str) -> AppResult<()> {
        let user = actor.require()?;
        let target = self.user_by_username(target_username).await?;

        if user.id == target.id {
            return Err(AppError::SelfFollow);
        }

        let mine = self.profile_of(&user.id).await?;
        let theirs = self.profile_of(&target.id).await?;

        if self.profiles.is_following(&mine.id, &theirs.id).await? {
            return Err(AppError::AlreadyFollowing);
        }

        self.profiles
            .add_follower_edges(&[FollowEdge::new(&mine, &theirs)])
            .await?;

        tracing::info!(user_id = %user.id, target_id = %target.id, "Followed directly");
        Ok(())
    }

    // ==================== Queries ====================

    /// Profiles following `username`.
    pub async fn followers(&self, username: &str) -> AppResult<Vec<profile::Model>> {
        let user = self.user_by_username(username).await?;
        let profile = self.profile_of(&user.id).await?;
        self.profiles.followers(&profile.id).await
    }

    /// Profiles `username` follows.
    pub async fn following(&self, username: &str) -> AppResult<Vec<profile::Model>> {
        let user = self.user_by_username(username).await?;
        let profile = self.profile_of(&user.id).await?;
        self.profiles.following(&profile.id).await
    }

    /// Followers of the actor. Empty for an anonymous actor.
    pub async fn my_followers(&self, actor: &Actor) -> AppResult<Vec<profile::Model>> {
        match actor.user() {
            Some(user) => {
                let profile = self.profile_of(&user.id).await?;
                self.profiles.followers(&profile.id).await
            }
            None => Ok(vec![]),
        }
    }

    /// Profiles the actor follows. Empty for an anonymous actor.
    pub async fn my_following(&self, actor: &Actor) -> AppResult<Vec<profile::Model>> {
        match actor.user() {
            Some(user) => {
                let profile = self.profile_of(&user.id).await?;
                self.profiles.following(&profile.id).await
            }
            None => Ok(vec![]),
        }
    }

    /// How the actor relates to `username`.
    pub async fn relation(&self, actor: &Actor, username: &str) -> AppResult<FollowRelation> {
        let user = actor.require()?;
        let other = self.user_by_username(username).await?;

        let mine = self.profile_of(&user.id).await?;
        let theirs = self.profile_of(&other.id).await?;

        let following = self.profiles.is_following(&mine.id, &theirs.id).await?;
        let followed_by = self.profiles.is_following(&theirs.id, &mine.id).await?;

        Ok(FollowRelation {
            following,
            followed_by,
            mutual: following && followed_by,
        })
    }

    /// Whether two profiles follow each other.
    pub async fn is_mutual(&self, a_profile_id: &str, b_profile_id: &str) -> AppResult<bool> {
        Ok(self.profiles.is_following(a_profile_id, b_profile_id).await?
            && self.profiles.is_following(b_profile_id, a_profile_id).await?)
    }

    // ==================== Helpers ====================

    /// Load a request the actor may resolve.
    ///
    /// Checks run in order: signed in, request exists, actor is the target,
    /// request still pending.
    async fn pending_request_for(
        &self,
        actor: &Actor,
        request_token: &str,
    ) -> AppResult<follow_request::Model> {
        let user = actor.require()?;

        let request = self
            .requests
            .find_by_token(request_token)
            .await?
            .ok_or_else(|| AppError::FollowRequestNotFound(request_token.to_string()))?;

        if request.target_id != user.id {
            return Err(AppError::Forbidden(
                "Only the recipient can resolve this follow request".to_string(),
            ));
        }

        if !request.status.is_pending() {
            return Err(AppError::NotPending);
        }

        Ok(request)
    }

    async fn user_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    async fn profile_of(&self, user_id: &str) -> AppResult<profile::Model> {
        self.profiles
            .profile_of(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile of user {user_id}")))
    }
}
