//! Following endpoints.
//!
//! Follow requests are addressed by their short token. Users are addressed
//! by username.

use axum::{Json, Router, extract::State, routing::post};
use ideaboard_common::AppResult;
use ideaboard_core::FollowRelation;
use ideaboard_db::entities::{
    follow_request::{self, FollowRequestStatus},
    profile,
};
use serde::{Deserialize, Serialize};

use super::users::ProfileResponse;
use crate::{extractors::CurrentActor, middleware::AppState, response::ApiResponse};

/// Request naming another user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameRequest {
    pub username: String,
}

/// Request naming a follow request by token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTokenRequest {
    pub request_id: String,
}

/// Follow request response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequestResponse {
    pub id: String,
    pub requester_id: String,
    pub target_id: String,
    pub status: &'static str,
    pub created_at: String,
    pub updated_at: String,
}

impl From<follow_request::Model> for FollowRequestResponse {
    fn from(request: follow_request::Model) -> Self {
        Self {
            id: request.request_id,
            requester_id: request.requester_id,
            target_id: request.target_id,
            status: match request.status {
                FollowRequestStatus::Pending => "pending",
                FollowRequestStatus::Accepted => "accepted",
                FollowRequestStatus::Rejected => "rejected",
            },
            created_at: request.created_at.to_rfc3339(),
            updated_at: request.updated_at.to_rfc3339(),
        }
    }
}

fn requests_response(
    requests: Vec<follow_request::Model>,
) -> ApiResponse<Vec<FollowRequestResponse>> {
    ApiResponse::ok(requests.into_iter().map(Into::into).collect())
}

fn profiles_response(
    profiles: Vec<profile::Model>,
) -> ApiResponse<Vec<ProfileResponse>> {
    ApiResponse::ok(profiles.into_iter().map(Into::into).collect())
}

// ==================== Follow requests ====================

/// Send a follow request.
async fn send_request(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<FollowRequestResponse>> {
    let request = state
        .follow_graph_service
        .send_request(&actor, &req.username)
        .await?;
    Ok(ApiResponse::ok(request.into()))
}

/// Accept a follow request addressed to the signed-in user.
async fn accept_request(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<RequestTokenRequest>,
) -> AppResult<ApiResponse<FollowRequestResponse>> {
    let request = state
        .follow_graph_service
        .accept_request(&actor, &req.request_id)
        .await?;
    Ok(ApiResponse::ok(request.into()))
}

/// Reject a follow request addressed to the signed-in user.
async fn reject_request(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<RequestTokenRequest>,
) -> AppResult<ApiResponse<FollowRequestResponse>> {
    let request = state
        .follow_graph_service
        .reject_request(&actor, &req.request_id)
        .await?;
    Ok(ApiResponse::ok(request.into()))
}

/// Requests addressed to the signed-in user.
async fn received_requests(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FollowRequestResponse>>> {
    let requests = state.follow_graph_service.received_requests(&actor).await?;
    Ok(requests_response(requests))
}

/// Requests sent by the signed-in user.
async fn sent_requests(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FollowRequestResponse>>> {
    let requests = state.follow_graph_service.sent_requests(&actor).await?;
    Ok(requests_response(requests))
}

// ==================== Edges ====================

/// Follow a user without a request.
async fn create(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .follow_graph_service
        .follow_directly(&actor, &req.username)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Stop following a user.
async fn delete(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .follow_graph_service
        .unfollow(&actor, &req.username)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Remove a follower of the signed-in user.
async fn remove_follower(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .follow_graph_service
        .remove_follower(&actor, &req.username)
        .await?;
    Ok(ApiResponse::ok(()))
}

// ==================== Queries ====================

/// Followers of a user.
async fn followers(
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let profiles = state.follow_graph_service.followers(&req.username).await?;
    Ok(profiles_response(profiles))
}

/// Profiles a user follows.
async fn following(
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let profiles = state.follow_graph_service.following(&req.username).await?;
    Ok(profiles_response(profiles))
}

/// Followers of the signed-in user.
async fn my_followers(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let profiles = state.follow_graph_service.my_followers(&actor).await?;
    Ok(profiles_response(profiles))
}

/// Profiles the signed-in user follows.
async fn my_following(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let profiles = state.follow_graph_service.my_following(&actor).await?;
    Ok(profiles_response(profiles))
}

/// How the signed-in user and another user are connected.
async fn relation(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UsernameRequest>,
) -> AppResult<ApiResponse<FollowRelation>> {
    let relation = state
        .follow_graph_service
        .relation(&actor, &req.username)
        .await?;
    Ok(ApiResponse::ok(relation))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests/send", post(send_request))
        .route("/requests/accept", post(accept_request))
        .route("/requests/reject", post(reject_request))
        .route("/requests/received", post(received_requests))
        .route("/requests/sent", post(sent_requests))
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/followers/remove", post(remove_follower))
        .route("/followers", post(followers))
        .route("/following", post(following))
        .route("/mine/followers", post(my_followers))
        .route("/mine/following", post(my_following))
        .route("/relation", post(relation))
}
