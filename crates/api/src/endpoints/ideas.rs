//! Idea endpoints.

use axum::{Json, Router, extract::State, routing::post};
use ideaboard_common::AppResult;
use ideaboard_core::{CreateIdeaInput, DislikeToggle, IdeaDetails, LikeToggle, UpdateIdeaInput};
use ideaboard_db::entities::idea::{self, Visibility};
use serde::{Deserialize, Serialize};

use crate::{extractors::CurrentActor, middleware::AppState, response::ApiResponse};

/// Idea response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub visibility: Visibility,
    pub active: bool,
    pub slug: String,
    pub views: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<idea::Model> for IdeaResponse {
    fn from(idea: idea::Model) -> Self {
        Self {
            id: idea.idea_id,
            title: idea.title,
            body: idea.body,
            author_id: idea.author_id,
            visibility: idea.visibility,
            active: idea.active,
            slug: idea.slug,
            views: idea.views,
            created_at: idea.created_at.to_rfc3339(),
            updated_at: idea.updated_at.to_rfc3339(),
        }
    }
}

/// Idea response with vote totals.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDetailsResponse {
    #[serde(flatten)]
    pub idea: IdeaResponse,
    pub likes_count: u64,
    pub dislikes_count: u64,
}

impl From<IdeaDetails> for IdeaDetailsResponse {
    fn from(details: IdeaDetails) -> Self {
        Self {
            idea: details.idea.into(),
            likes_count: details.likes_count,
            dislikes_count: details.dislikes_count,
        }
    }
}

fn ideas_response(ideas: Vec<idea::Model>) -> ApiResponse<Vec<IdeaResponse>> {
    ApiResponse::ok(ideas.into_iter().map(Into::into).collect())
}

/// Request naming an idea by its short token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaIdRequest {
    pub idea_id: String,
}

/// Show idea request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowIdeaRequest {
    pub slug: String,
}

/// Update idea request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdeaRequest {
    pub idea_id: String,
    #[serde(flatten)]
    pub changes: UpdateIdeaInput,
}

/// Every idea.
async fn list_all(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<IdeaResponse>>> {
    let ideas = state.idea_service.list_all().await?;
    Ok(ideas_response(ideas))
}

/// Active public ideas.
async fn list_public(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<IdeaResponse>>> {
    let ideas = state.idea_service.list_public().await?;
    Ok(ideas_response(ideas))
}

/// Ideas of the signed-in user.
async fn list_mine(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<IdeaResponse>>> {
    let ideas = state.idea_service.list_mine(&actor).await?;
    Ok(ideas_response(ideas))
}

/// Show an idea by slug.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowIdeaRequest>,
) -> AppResult<ApiResponse<IdeaDetailsResponse>> {
    let details = state.idea_service.show(&req.slug).await?;
    Ok(ApiResponse::ok(details.into()))
}

/// Post an idea.
async fn create(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<CreateIdeaInput>,
) -> AppResult<ApiResponse<IdeaResponse>> {
    let idea = state.idea_service.create(&actor, req).await?;
    Ok(ApiResponse::ok(idea.into()))
}

/// Edit an idea of the signed-in user.
async fn update(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<UpdateIdeaRequest>,
) -> AppResult<ApiResponse<IdeaResponse>> {
    let idea = state
        .idea_service
        .update(&actor, &req.idea_id, req.changes)
        .await?;
    Ok(ApiResponse::ok(idea.into()))
}

/// Delete an idea of the signed-in user.
async fn delete(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<IdeaIdRequest>,
) -> AppResult<ApiResponse<()>> {
    state.idea_service.delete(&actor, &req.idea_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle the signed-in user's like.
async fn like(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<IdeaIdRequest>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let toggle = state.idea_service.toggle_like(&actor, &req.idea_id).await?;
    Ok(ApiResponse::ok(toggle))
}

/// Toggle the signed-in user's dislike.
async fn dislike(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(req): Json<IdeaIdRequest>,
) -> AppResult<ApiResponse<DislikeToggle>> {
    let toggle = state
        .idea_service
        .toggle_dislike(&actor, &req.idea_id)
        .await?;
    Ok(ApiResponse::ok(toggle))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(list_all))
        .route("/public", post(list_public))
        .route("/mine", post(list_mine))
        .route("/show", post(show))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", post(delete))
        .route("/like", post(like))
        .route("/dislike", post(dislike))
}
