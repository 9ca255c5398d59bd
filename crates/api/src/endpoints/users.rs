//! User and profile endpoints.

use axum::{Json, Router, extract::State, routing::post};
use ideaboard_common::{AppError, AppResult};
use ideaboard_core::{ProfileDetails, UpdateProfileInput};
use ideaboard_db::entities::{profile, user};
use serde::{Deserialize, Serialize};

use crate::{extractors::CurrentActor, middleware::AppState, response::ApiResponse};

/// User response. Credentials are never included.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub verified: bool,
    pub slug: String,
    pub created_at: String,
}

impl From<profile::Model> for ProfileResponse {
    fn from(profile: profile::Model) -> Self {
        Self {
            id: profile.profile_id,
            username: profile.username,
            full_name: profile.full_name,
            bio: profile.bio,
            country: profile.country,
            city: profile.city,
            verified: profile.verified,
            slug: profile.slug,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

/// Profile response with follower totals.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetailsResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub followers_count: u64,
    pub following_count: u64,
}

impl From<ProfileDetails> for ProfileDetailsResponse {
    fn from(details: ProfileDetails) -> Self {
        Self {
            profile: details.profile.into(),
            followers_count: details.followers_count,
            following_count: details.following_count,
        }
    }
}

/// List every user.
async fn list_users(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.account_service.list_users().await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// List every profile.
async fn list_profiles(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let profiles = state.profile_service.list().await?;
    Ok(ApiResponse::ok(profiles.into_iter().map(Into::into).collect()))
}

/// List verified profiles.
async fn list_verified(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let profiles = state.profile_service.list_verified().await?;
    Ok(ApiResponse::ok(profiles.into_iter().map(Into::into).collect()))
}

/// Show profile request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowProfileRequest {
    pub username: Option<String>,
    pub slug: Option<String>,
}

/// Show a profile by username or slug.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowProfileRequest>,
) -> AppResult<ApiResponse<ProfileDetailsResponse>> {
    let details = if let Some(username) = req.username {
        state.profile_service.show(&username).await?
    } else if let Some(slug) = req.slug {
        state.profile_service.show_by_slug(&slug).await?
    } else {
        return Err(AppError::BadRequest(
            "Either username or slug is required".to_string(),
        ));
    };

    Ok(ApiResponse::ok(details.into()))
}

/// Show the signed-in user's profile.
async fn mine(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileDetailsResponse>> {
    let details = state.profile_service.mine(&actor).await?;
    Ok(ApiResponse::ok(details.into()))
}

/// Update the signed-in user's profile.
async fn update(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.profile_service.update_mine(&actor, req).await?;
    Ok(ApiResponse::ok(profile.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(list_users))
        .route("/profiles", post(list_profiles))
        .route("/profiles/verified", post(list_verified))
        .route("/profiles/show", post(show))
        .route("/i/profile", post(mine))
        .route("/i/profile/update", post(update))
}
