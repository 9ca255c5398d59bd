//! Profile service.

use crate::actor::Actor;
use crate::stores::SharedProfileStore;
use ideaboard_common::{AppError, AppResult};
use ideaboard_db::entities::profile;
use serde::Deserialize;
use validator::Validate;

/// Input for updating the actor's profile. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 100))]
    pub full_name: Option<String>,

    #[validate(length(max = 200))]
    pub bio: Option<String>,

    #[validate(length(max = 50))]
    pub country: Option<String>,

    #[validate(length(max = 50))]
    pub city: Option<String>,
}

/// A profile with its follower counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub profile: profile::Model,
    pub followers_count: u64,
    pub following_count: u64,
}

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profiles: SharedProfileStore,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub fn new(profiles: SharedProfileStore) -> Self {
        Self { profiles }
    }

    /// All profiles, newest first.
    pub async fn list(&self) -> AppResult<Vec<profile::Model>> {
        self.profiles.list(false).await
    }

    /// Verified profiles, newest first.
    pub async fn list_verified(&self) -> AppResult<Vec<profile::Model>> {
        self.profiles.list(true).await
    }

    /// Show a profile by its owner's username.
    pub async fn show(&self, username: &str) -> AppResult<ProfileDetails> {
        let profile = self
            .profiles
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;
        self.with_counts(profile).await
    }

    /// Show a profile by slug.
    pub async fn show_by_slug(&self, slug: &str) -> AppResult<ProfileDetails> {
        let profile = self
            .profiles
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {slug}")))?;
        self.with_counts(profile).await
    }

    /// The actor's own profile.
    pub async fn mine(&self, actor: &Actor) -> AppResult<ProfileDetails> {
        let profile = self.own_profile(actor).await?;
        self.with_counts(profile).await
    }

    /// Update the actor's profile.
    pub async fn update_mine(
        &self,
        actor: &Actor,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input.validate()?;
        let mut profile = self.own_profile(actor).await?;

        if let Some(full_name) = input.full_name {
            profile.full_name = Some(full_name);
        }
        if let Some(bio) = input.bio {
            profile.bio = Some(bio);
        }
        if let Some(country) = input.country {
            profile.country = Some(country);
        }
        if let Some(city) = input.city {
            profile.city = Some(city);
        }

        let profile = self.profiles.update(profile).await?;
        tracing::debug!(profile_id = %profile.profile_id, "Updated profile");
        Ok(profile)
    }

    async fn own_profile(&self, actor: &Actor) -> AppResult<profile::Model> {
        let user = actor.require()?;
        self.profiles
            .profile_of(&user.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile of user {}", user.id)))
    }

    async fn with_counts(&self, profile: profile::Model) -> AppResult<ProfileDetails> {
        let followers_count = self.profiles.count_followers(&profile.id).await?;
        let following_count = self.profiles.count_following(&profile.id).await?;
        Ok(ProfileDetails {
            profile,
            followers_count,
            following_count,
        })
    }
}
