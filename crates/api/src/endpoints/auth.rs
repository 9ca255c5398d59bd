//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use ideaboard_common::AppResult;
use ideaboard_core::{Actor, ChangePasswordInput, LoginInput, RegisterInput};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, CurrentActor},
    middleware::AppState,
    response::ApiResponse,
};

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub token: String,
    pub profile_id: String,
    pub profile_slug: String,
}

/// Create a new user account together with its profile.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let (user, profile) = state.account_service.register(req).await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id,
        username: user.username,
        token: user.token.unwrap_or_default(),
        profile_id: profile.profile_id,
        profile_slug: profile.slug,
    }))
}

/// Signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in with email and password.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<LoginInput>,
) -> AppResult<ApiResponse<SigninResponse>> {
    let user = state.account_service.login(req).await?;

    Ok(ApiResponse::ok(SigninResponse {
        id: user.id,
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Sign out, invalidating the current token.
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.account_service.logout(&Actor::User(user)).await?;
    Ok(ApiResponse::ok(()))
}

/// Change the password of the signed-in user.
async fn change_password(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordInput>,
) -> AppResult<ApiResponse<()>> {
    state.account_service.change_password(&actor, req).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
        .route("/i/change-password", post(change_password))
}
